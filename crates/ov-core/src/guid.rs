//! 128-bit interface identifiers
//!
//! Rendered in the braced registry form, e.g.
//! `{00020400-0000-0000-c000-000000000046}`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

/// A GUID naming an interface or class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Guid(Uuid);

impl Guid {
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Build from the native struct layout (Data1, Data2, Data3, Data4)
    pub fn from_fields(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self(Uuid::from_fields(data1, data2, data3, &data4))
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.braced())
    }
}

impl FromStr for Guid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::InvalidGuid(s.to_string()))
    }
}

impl TryFrom<String> for Guid {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Guid> for String {
    fn from(guid: Guid) -> Self {
        guid.to_string()
    }
}

impl From<Uuid> for Guid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// IUnknown, the identity interface every object answers
pub const IID_IUNKNOWN: Guid = Guid::from_u128(0x00000000_0000_0000_c000_000000000046);

/// IDispatch, late-bound automation
pub const IID_IDISPATCH: Guid = Guid::from_u128(0x00020400_0000_0000_c000_000000000046);

/// IObjectSafety, the optional safety-options interface
pub const IID_IOBJECTSAFETY: Guid = Guid::from_u128(0xcb5bdc81_93c1_11cf_8f20_00805f2cd064);

/// IOleObject, implemented by embeddable controls
pub const IID_IOLEOBJECT: Guid = Guid::from_u128(0x00000112_0000_0000_c000_000000000046);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braced_display() {
        assert_eq!(
            IID_IDISPATCH.to_string(),
            "{00020400-0000-0000-c000-000000000046}"
        );
        assert_eq!(
            IID_IOBJECTSAFETY.to_string(),
            "{cb5bdc81-93c1-11cf-8f20-00805f2cd064}"
        );
    }

    #[test]
    fn test_parse_braced_and_plain() {
        let braced: Guid = "{CB5BDC81-93C1-11CF-8F20-00805F2CD064}".parse().unwrap();
        let plain: Guid = "cb5bdc81-93c1-11cf-8f20-00805f2cd064".parse().unwrap();
        assert_eq!(braced, IID_IOBJECTSAFETY);
        assert_eq!(plain, IID_IOBJECTSAFETY);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-a-guid".parse::<Guid>().is_err());
        assert!("{00020400-0000-0000-c000}".parse::<Guid>().is_err());
    }

    #[test]
    fn test_from_fields_matches_struct_layout() {
        let guid = Guid::from_fields(
            0x00020400,
            0x0000,
            0x0000,
            [0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46],
        );
        assert_eq!(guid, IID_IDISPATCH);
    }

    #[test]
    fn test_serde_uses_braced_string() {
        let json = serde_json::to_string(&IID_IUNKNOWN).unwrap();
        assert_eq!(json, "\"{00000000-0000-0000-c000-000000000046}\"");
        let back: Guid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, IID_IUNKNOWN);
    }
}
