//! Inspection sessions
//!
//! A session lasts as long as one inspection window. Opening it caches the
//! object and builds the property and interface tables; closing it releases
//! the cache entry. Viewers are launched from an active session only.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use ov_core::{Error, Guid, InterfaceDescriptor, ObjectRef, PropertyTable, Result, SafetyCapabilities};
use ov_introspection::{ObjectCache, SafetyCapabilityProbe};
use ov_plugins::{create_special_viewer, SpecialViewer, ViewerHandle, ViewerRegistry};

use crate::model::{DisplayModel, InterfaceRow, PropertyRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Opening,
    Active,
    Closed,
}

pub struct InspectionSession {
    id: Uuid,
    name: String,
    object: ObjectRef,
    interfaces: Vec<InterfaceDescriptor>,
    safety: Option<SafetyCapabilities>,
    property_rows: Vec<PropertyRow>,
    interface_rows: Vec<InterfaceRow>,
    dispatch_enabled: bool,
    control_container_enabled: bool,
    state: SessionState,
    opened_at: DateTime<Utc>,
    cache: Arc<ObjectCache>,
    viewers: Arc<ViewerRegistry>,
}

impl InspectionSession {
    pub(crate) fn open(
        cache: Arc<ObjectCache>,
        viewers: Arc<ViewerRegistry>,
        probe: &SafetyCapabilityProbe,
        name: String,
        object: ObjectRef,
        properties: PropertyTable,
        interfaces: Vec<InterfaceDescriptor>,
    ) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            name,
            object,
            interfaces: dedup_interfaces(interfaces),
            safety: None,
            property_rows: Vec::new(),
            interface_rows: Vec::new(),
            dispatch_enabled: false,
            control_container_enabled: false,
            state: SessionState::Opening,
            opened_at: Utc::now(),
            cache,
            viewers,
        };

        session.cache.add(
            session.name.clone(),
            Arc::clone(&session.object),
            session.interfaces.clone(),
        );
        session.load_properties(properties, probe);
        session.load_interfaces();
        session.state = SessionState::Active;

        info!(
            "Opened session '{}' ({}) with {} interfaces",
            session.name,
            session.id,
            session.interfaces.len()
        );
        session
    }

    fn load_properties(&mut self, properties: PropertyTable, probe: &SafetyCapabilityProbe) {
        self.property_rows = properties
            .into_iter()
            .map(|(key, value)| PropertyRow { key, value })
            .collect();

        // Safety options are optional; failure just means no extra rows.
        self.safety = probe.probe(&*self.object).ok();
        if let Some(caps) = self.safety {
            for option in caps.present() {
                let Some(name) = option.name() else { continue };
                let value = if caps.is_enabled(option) {
                    "enabled"
                } else {
                    "supported"
                };
                self.property_rows.push(PropertyRow::new(name, value));
            }
        }
    }

    fn load_interfaces(&mut self) {
        self.interface_rows = self
            .interfaces
            .iter()
            .map(|iface| InterfaceRow {
                name: iface.name.clone(),
                iid: iface.iid.to_string(),
                viewable: self.viewers.can_view(&iface.iid),
            })
            .collect();

        self.dispatch_enabled = self.interfaces.iter().any(|i| i.is_dispatch);
        self.control_container_enabled = self.interfaces.iter().any(|i| i.is_ole_control);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    pub fn interfaces(&self) -> &[InterfaceDescriptor] {
        &self.interfaces
    }

    /// Safety options read when the session opened, if the object has any
    pub fn safety(&self) -> Option<SafetyCapabilities> {
        self.safety
    }

    pub fn display_model(&self) -> DisplayModel {
        DisplayModel {
            session_id: self.id,
            name: self.name.clone(),
            opened_at: self.opened_at,
            properties: self.property_rows.clone(),
            interfaces: self.interface_rows.clone(),
            dispatch_enabled: self.dispatch_enabled,
            control_container_enabled: self.control_container_enabled,
        }
    }

    fn ensure_active(&self) -> Result<()> {
        match self.state {
            SessionState::Active => Ok(()),
            _ => Err(Error::SessionClosed(self.name.clone())),
        }
    }

    /// Launch the registered viewer for `iid`.
    ///
    /// `Ok(None)` when no viewer handles the interface. A construction
    /// failure is returned to the caller and leaves the session active.
    pub fn launch_viewer(&self, iid: &Guid) -> Result<Option<ViewerHandle>> {
        self.ensure_active()?;
        self.viewers
            .create_viewer(iid, &self.name, Arc::clone(&self.object))
    }

    /// Launch the viewer for the interface at `row` of the interface table
    pub fn launch_viewer_at(&self, row: usize) -> Result<Option<ViewerHandle>> {
        let iid = self
            .interfaces
            .get(row)
            .map(|i| i.iid)
            .ok_or_else(|| Error::not_found(format!("interface row {}", row)))?;
        self.launch_viewer(&iid)
    }

    pub fn launch_special_viewer(&self, kind: SpecialViewer) -> Result<ViewerHandle> {
        self.ensure_active()?;
        create_special_viewer(kind, &self.name, Arc::clone(&self.object))
    }

    /// Close the session and release its cache entry.
    ///
    /// Returns false if the session was already closed.
    pub fn close(&mut self) -> bool {
        if self.state == SessionState::Closed {
            debug!("Session '{}' already closed", self.name);
            return false;
        }

        self.cache.remove_entry(&self.name, &self.object);
        self.state = SessionState::Closed;
        info!("Closed session '{}' ({})", self.name, self.id);
        true
    }
}

impl Drop for InspectionSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Keep the first descriptor for each IID
fn dedup_interfaces(interfaces: Vec<InterfaceDescriptor>) -> Vec<InterfaceDescriptor> {
    let mut seen = HashSet::new();
    interfaces
        .into_iter()
        .filter(|iface| {
            let first = seen.insert(iface.iid);
            if !first {
                warn!("Dropping duplicate interface {} ({})", iface.name, iface.iid);
            }
            first
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ov_core::guid::{IID_IDISPATCH, IID_IUNKNOWN};

    #[test]
    fn test_dedup_keeps_first() {
        let interfaces = vec![
            InterfaceDescriptor::new(IID_IUNKNOWN, "IUnknown"),
            InterfaceDescriptor::new(IID_IDISPATCH, "IDispatch").dispatch(),
            InterfaceDescriptor::new(IID_IUNKNOWN, "IUnknown again"),
        ];
        let deduped = dedup_interfaces(interfaces);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].name, "IUnknown");
        assert!(deduped[1].is_dispatch);
    }
}
