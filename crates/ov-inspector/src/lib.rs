//! ov-inspector: object inspection sessions
//!
//! The `Inspector` owns the process-wide object cache and viewer registry
//! and opens `InspectionSession`s against them. The presentation layer
//! consumes each session's `DisplayModel` and launches viewers through it.

pub mod model;
pub mod session;

pub use model::{DisplayModel, InterfaceRow, PropertyRow};
pub use session::{InspectionSession, SessionState};

use ov_core::{InterfaceDescriptor, ObjectRef, PropertyTable};
use ov_introspection::{DescribedObject, ObjectCache, SafetyCapabilityProbe};
use ov_plugins::{register_builtin_viewers, ViewerRegistry};
use std::sync::Arc;

/// Owner of the shared inspection state
#[derive(Clone, Default)]
pub struct Inspector {
    cache: Arc<ObjectCache>,
    viewers: Arc<ViewerRegistry>,
    probe: SafetyCapabilityProbe,
}

impl Inspector {
    /// Inspector with an empty viewer registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspector with the built-in viewers registered
    pub fn with_builtin_viewers() -> Self {
        let inspector = Self::new();
        register_builtin_viewers(&inspector.viewers);
        inspector
    }

    pub fn with_registry(viewers: Arc<ViewerRegistry>) -> Self {
        Self {
            viewers,
            ..Self::default()
        }
    }

    /// Open a session for `object` under `name`
    pub fn open_session(
        &self,
        name: impl Into<String>,
        object: ObjectRef,
        properties: PropertyTable,
        interfaces: Vec<InterfaceDescriptor>,
    ) -> InspectionSession {
        InspectionSession::open(
            Arc::clone(&self.cache),
            Arc::clone(&self.viewers),
            &self.probe,
            name.into(),
            object,
            properties,
            interfaces,
        )
    }

    /// Open a session for a described object using its own name and tables
    pub fn open_described(&self, object: DescribedObject) -> InspectionSession {
        let name = object.name().to_string();
        let properties = object.properties().clone();
        let interfaces = object.interfaces().to_vec();
        self.open_session(name, Arc::new(object), properties, interfaces)
    }

    pub fn cache(&self) -> Arc<ObjectCache> {
        Arc::clone(&self.cache)
    }

    pub fn viewers(&self) -> Arc<ViewerRegistry> {
        Arc::clone(&self.viewers)
    }
}
