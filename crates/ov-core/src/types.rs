//! Common types used across oview

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Guid;

/// Textual properties shown for an object, in insertion order
pub type PropertyTable = IndexMap<String, String>;

/// One interface an object supports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    pub iid: Guid,
    pub name: String,
    #[serde(default)]
    pub is_dispatch: bool,
    #[serde(default)]
    pub is_ole_control: bool,
}

impl InterfaceDescriptor {
    /// Create a descriptor, naming it after its IID when no name is known
    pub fn new(iid: Guid, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            iid,
            name: if name.trim().is_empty() {
                iid.to_string()
            } else {
                name
            },
            is_dispatch: false,
            is_ole_control: false,
        }
    }

    pub fn dispatch(mut self) -> Self {
        self.is_dispatch = true;
        self
    }

    pub fn ole_control(mut self) -> Self {
        self.is_ole_control = true;
        self
    }
}

impl PartialEq for InterfaceDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.iid == other.iid
    }
}

impl Eq for InterfaceDescriptor {}

/// Number of safety option bits known to the inspector
pub const SAFETY_OPTION_BITS: u32 = 4;

bitflags::bitflags! {
    /// Object safety options reported through the safety interface.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SafetyOptions: u32 {
        const INTERFACESAFE_FOR_UNTRUSTED_CALLER = 1 << 0;
        const INTERFACESAFE_FOR_UNTRUSTED_DATA = 1 << 1;
        const INTERFACE_USES_DISPEX = 1 << 2;
        const INTERFACE_USES_SECURITY_MANAGER = 1 << 3;
    }
}

impl SafetyOptions {
    /// Symbolic name of a single known option
    pub fn name(self) -> Option<&'static str> {
        let mut names = self.iter_names();
        match (names.next(), names.next()) {
            (Some((name, _)), None) => Some(name),
            _ => None,
        }
    }
}

/// Decoded safety capabilities of one object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SafetyCapabilities {
    supported: SafetyOptions,
    enabled: SafetyOptions,
}

impl SafetyCapabilities {
    /// Decode raw masks. Unknown bits are dropped and enabled options are
    /// limited to the supported ones.
    pub fn from_raw(supported: u32, enabled: u32) -> Self {
        let supported = SafetyOptions::from_bits_truncate(supported);
        let enabled = SafetyOptions::from_bits_truncate(enabled) & supported;
        Self { supported, enabled }
    }

    pub fn supported(&self) -> SafetyOptions {
        self.supported
    }

    pub fn enabled(&self) -> SafetyOptions {
        self.enabled
    }

    /// Supported options, one per bit, lowest bit first
    pub fn present(&self) -> Vec<SafetyOptions> {
        (0..SAFETY_OPTION_BITS)
            .map(|position| 1u32 << position)
            .filter(|value| value & self.supported.bits() != 0)
            .map(SafetyOptions::from_bits_retain)
            .collect()
    }

    pub fn is_enabled(&self, option: SafetyOptions) -> bool {
        self.enabled.contains(option)
    }
}

/// Kind of a dispatch member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    #[default]
    Method,
    PropertyGet,
    PropertyPut,
}

/// Member exposed through late-bound automation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchMember {
    pub dispid: i32,
    pub name: String,
    #[serde(default)]
    pub kind: MemberKind,
}

/// Type information returned by a dispatch interface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    #[serde(default)]
    pub members: Vec<DispatchMember>,
}
