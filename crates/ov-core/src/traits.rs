//! Object model traits
//!
//! An inspected object is opaque: the only way to learn anything about it is
//! to ask it for an interface by identifier. These traits are what an object
//! model (native bindings, a described fixture, ...) plugs in underneath the
//! inspector.

use std::sync::Arc;

use crate::{Guid, Result, TypeInfo};

/// Result of a successful interface query
pub enum InterfaceRef<'a> {
    /// The object-safety options interface
    ObjectSafety(&'a dyn ObjectSafety),
    /// Late-bound automation with type information
    Dispatch(&'a dyn Dispatch),
    /// The interface exists but the inspector has no typed binding for it
    Opaque,
}

impl InterfaceRef<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            InterfaceRef::ObjectSafety(_) => "object-safety",
            InterfaceRef::Dispatch(_) => "dispatch",
            InterfaceRef::Opaque => "opaque",
        }
    }
}

/// An object that can be queried for the interfaces it supports
pub trait InspectableObject: Send + Sync {
    /// Ask the object for an interface.
    ///
    /// Returns `Error::NoInterface` when the object does not support it and
    /// `Error::CallFailed` when the query itself fails.
    fn query_interface(&self, iid: &Guid) -> Result<InterfaceRef<'_>>;
}

/// Optional safety-options interface
pub trait ObjectSafety: Send + Sync {
    /// Options that apply when the object is used through `iid`.
    ///
    /// Returns `(supported, enabled)` raw option masks.
    fn interface_safety_options(&self, iid: &Guid) -> Result<(u32, u32)>;
}

/// Late-bound automation interface
pub trait Dispatch: Send + Sync {
    fn type_info(&self) -> Result<TypeInfo>;
}

/// Shared handle to an inspected object
pub type ObjectRef = Arc<dyn InspectableObject>;

/// Identity comparison between two object handles.
///
/// Compares the data pointers only; two handles to the same allocation are
/// the same object even if they were coerced through different vtables.
pub fn same_object(a: &ObjectRef, b: &ObjectRef) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
