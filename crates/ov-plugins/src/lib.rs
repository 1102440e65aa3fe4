//! ov-plugins: interface viewers
//!
//! Features:
//! - `Viewer` / `ViewerFactory` traits implemented by viewer modules
//! - `ViewerRegistry` resolving a factory by interface identifier
//! - Built-in viewers: object safety, typed dispatch, control container

pub mod builtin;
pub mod registry;
pub mod special;
pub mod viewer;

pub use builtin::{register_builtin_viewers, ObjectSafetyViewer, ObjectSafetyViewerFactory};
pub use registry::ViewerRegistry;
pub use special::{create_special_viewer, ObjectContainerViewer, SpecialViewer, TypedObjectViewer};
pub use viewer::{BoxedViewerFactory, Viewer, ViewerFactory, ViewerHandle};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::registry::ViewerRegistry;
    pub use super::special::{create_special_viewer, SpecialViewer};
    pub use super::viewer::{Viewer, ViewerFactory, ViewerHandle};
}
