//! Safety-option probing
//!
//! Many objects never implement the safety interface, and some fail the
//! call outright. Both come back as `CapabilityUnavailable`, which callers
//! treat as "nothing to show".

use ov_core::guid::{IID_IDISPATCH, IID_IOBJECTSAFETY};
use ov_core::{Error, Guid, InspectableObject, InterfaceRef, SafetyCapabilities};
use thiserror::Error;
use tracing::debug;

/// Why safety capabilities could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityUnavailable {
    #[error("object does not expose the safety interface")]
    NotExposed,

    #[error("safety interface query returned a {0} interface")]
    TypeMismatch(&'static str),

    #[error("safety query failed: {0}")]
    CallFailed(String),
}

/// Reads safety options from an object
#[derive(Debug, Clone, Copy)]
pub struct SafetyCapabilityProbe {
    /// Interface the options are requested for
    target: Guid,
}

impl SafetyCapabilityProbe {
    pub fn new() -> Self {
        Self {
            target: IID_IDISPATCH,
        }
    }

    pub fn probe(
        &self,
        object: &dyn InspectableObject,
    ) -> Result<SafetyCapabilities, CapabilityUnavailable> {
        let safety = match object.query_interface(&IID_IOBJECTSAFETY) {
            Ok(InterfaceRef::ObjectSafety(safety)) => safety,
            Ok(other) => return Err(self.unavailable(CapabilityUnavailable::TypeMismatch(other.kind()))),
            Err(Error::NoInterface(_)) => return Err(self.unavailable(CapabilityUnavailable::NotExposed)),
            Err(e) => return Err(self.unavailable(CapabilityUnavailable::CallFailed(e.to_string()))),
        };

        let (supported, enabled) = safety
            .interface_safety_options(&self.target)
            .map_err(|e| self.unavailable(CapabilityUnavailable::CallFailed(e.to_string())))?;

        let caps = SafetyCapabilities::from_raw(supported, enabled);
        debug!(
            "Safety options for {}: supported={:?} enabled={:?}",
            self.target,
            caps.supported(),
            caps.enabled()
        );
        Ok(caps)
    }

    fn unavailable(&self, reason: CapabilityUnavailable) -> CapabilityUnavailable {
        debug!("Safety options unavailable: {}", reason);
        reason
    }
}

impl Default for SafetyCapabilityProbe {
    fn default() -> Self {
        Self::new()
    }
}
