//! Error types for oview

use crate::Guid;
use thiserror::Error;

/// Main error type for object inspection
#[derive(Error, Debug)]
pub enum Error {
    #[error("Interface {0} is not supported by the object")]
    NoInterface(Guid),

    #[error("Object call failed: {0}")]
    CallFailed(String),

    #[error("Failed to construct {viewer} viewer: {reason}")]
    ViewerConstructionFailed { viewer: String, reason: String },

    #[error("Session '{0}' is closed")]
    SessionClosed(String),

    #[error("Invalid GUID '{0}'")]
    InvalidGuid(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an object call error
    pub fn call_failed(msg: impl Into<String>) -> Self {
        Error::CallFailed(msg.into())
    }

    /// Wrap a viewer factory failure
    pub fn viewer_construction(viewer: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Error::ViewerConstructionFailed {
            viewer: viewer.into(),
            reason: format!("{:#}", err),
        }
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// True for the one failure class the presentation layer must report
    pub fn is_viewer_failure(&self) -> bool {
        matches!(self, Error::ViewerConstructionFailed { .. })
    }
}
