//! Core viewer traits

use anyhow::Result;
use ov_core::ObjectRef;
use serde_json::Value;
use std::sync::Arc;

/// An interface-specific inspector for one object.
///
/// Viewers keep their own reference to the object, independent of the
/// session cache.
pub trait Viewer: Send + Sync {
    /// Title shown by the presentation layer
    fn title(&self) -> &str;

    /// Short identifier of the viewer type
    fn kind(&self) -> &'static str;

    /// The object being viewed
    fn object(&self) -> &ObjectRef;

    /// Structured content for the presentation layer to display
    fn render(&self) -> Value;
}

/// Handle returned to the presentation layer
pub type ViewerHandle = Box<dyn Viewer>;

/// Builds viewers for one interface
pub trait ViewerFactory: Send + Sync {
    /// Name of the viewer this factory builds
    fn name(&self) -> &str;

    /// Construct a viewer for `object`, shown under the session name `name`
    fn create(&self, name: &str, object: ObjectRef) -> Result<ViewerHandle>;
}

/// Shared factory type stored in the registry
pub type BoxedViewerFactory = Arc<dyn ViewerFactory>;
