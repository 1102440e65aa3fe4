//! Core types and utilities for oview
//!
//! # Modules
//!
//! - `config`: Environment configuration loading
//! - `error`: Error types and Result alias
//! - `guid`: 128-bit interface identifiers and well-known IIDs
//! - `traits`: The object model the inspector works against
//! - `types`: Interface descriptors, safety options, dispatch type info

pub mod config;
pub mod error;
pub mod guid;
pub mod traits;
pub mod types;

// Re-exports
pub use error::{Error, Result};
pub use guid::Guid;
pub use traits::{same_object, Dispatch, InspectableObject, InterfaceRef, ObjectRef, ObjectSafety};
pub use types::*;
