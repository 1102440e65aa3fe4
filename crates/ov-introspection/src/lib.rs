//! ov-introspection: what the inspector learns from an object
//!
//! This crate provides:
//! - Safety-option probing through the optional safety interface
//! - The name-keyed object cache that keeps inspected objects alive
//! - Described objects: an object model loaded from JSON/YAML descriptions

pub mod cache;
pub mod described;
pub mod probe;

pub use cache::{CachedObject, ObjectCache};
pub use described::{DescribedObject, ObjectDescription, SafetyDescription};
pub use probe::{CapabilityUnavailable, SafetyCapabilityProbe};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        CachedObject, CapabilityUnavailable, DescribedObject, ObjectCache, ObjectDescription,
        SafetyCapabilityProbe, SafetyDescription,
    };
}
