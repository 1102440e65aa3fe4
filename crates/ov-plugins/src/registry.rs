//! Interface viewer registry
//!
//! Viewer modules register a factory per interface identifier at startup.
//! Lookups are exact-match and have no side effects.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

use ov_core::{Error, Guid, ObjectRef, Result};

use crate::viewer::{BoxedViewerFactory, ViewerHandle};

#[derive(Default)]
pub struct ViewerRegistry {
    factories: RwLock<HashMap<Guid, BoxedViewerFactory>>,
}

impl ViewerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Guid, BoxedViewerFactory>> {
        self.factories.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a factory for `iid`. A later registration replaces an
    /// earlier one; the replaced factory is returned.
    pub fn register(&self, iid: Guid, factory: BoxedViewerFactory) -> Option<BoxedViewerFactory> {
        let name = factory.name().to_string();
        let previous = self
            .factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(iid, factory);

        match &previous {
            Some(old) => warn!(
                "Viewer '{}' for {} replaced by '{}'",
                old.name(),
                iid,
                name
            ),
            None => info!("Registered viewer '{}' for {}", name, iid),
        }
        previous
    }

    /// Factory registered for `iid`, if any
    pub fn resolve(&self, iid: &Guid) -> Option<BoxedViewerFactory> {
        self.read().get(iid).cloned()
    }

    pub fn can_view(&self, iid: &Guid) -> bool {
        self.read().contains_key(iid)
    }

    /// Resolve and construct a viewer.
    ///
    /// `Ok(None)` when no viewer handles `iid`. A failing factory is
    /// reported as `Error::ViewerConstructionFailed`.
    pub fn create_viewer(
        &self,
        iid: &Guid,
        name: &str,
        object: ObjectRef,
    ) -> Result<Option<ViewerHandle>> {
        // Don't hold the lock while the factory runs.
        let Some(factory) = self.resolve(iid) else {
            debug!("No viewer registered for {}", iid);
            return Ok(None);
        };

        match factory.create(name, object) {
            Ok(viewer) => {
                debug!("Created '{}' viewer for '{}'", factory.name(), name);
                Ok(Some(viewer))
            }
            Err(e) => {
                warn!("Viewer '{}' failed for '{}': {:#}", factory.name(), name, e);
                Err(Error::viewer_construction(factory.name(), e))
            }
        }
    }

    /// Registered identifiers with their factory names, ordered by IID
    pub fn registered(&self) -> Vec<(Guid, String)> {
        let mut entries: Vec<_> = self
            .read()
            .iter()
            .map(|(iid, factory)| (*iid, factory.name().to_string()))
            .collect();
        entries.sort_by_key(|(iid, _)| *iid);
        entries
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
