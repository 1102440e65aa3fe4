//! Objects backed by a JSON/YAML description
//!
//! A description lists the interfaces an object answers for, and optionally
//! the safety options and dispatch type information it reports. The CLI
//! inspects these, and they stand in for live objects in tests.

use std::path::Path;

use ov_core::guid::{IID_IDISPATCH, IID_IOBJECTSAFETY, IID_IUNKNOWN};
use ov_core::{
    Dispatch, Error, Guid, InspectableObject, InterfaceDescriptor, InterfaceRef, ObjectSafety,
    PropertyTable, Result, TypeInfo,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw safety option masks reported by a described object
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SafetyDescription {
    pub supported: u32,
    #[serde(default)]
    pub enabled: u32,
}

/// Serialized form of a described object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectDescription {
    pub name: String,
    #[serde(default)]
    pub properties: PropertyTable,
    #[serde(default)]
    pub interfaces: Vec<InterfaceDescriptor>,
    /// Options returned by the safety interface
    #[serde(default)]
    pub safety: Option<SafetyDescription>,
    /// The safety interface exists but its call fails with this message
    #[serde(default)]
    pub safety_error: Option<String>,
    #[serde(default)]
    pub type_info: Option<TypeInfo>,
    /// The dispatch interface exists but type info lookup fails
    #[serde(default)]
    pub dispatch_error: Option<String>,
}

impl ObjectDescription {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let description: Self = serde_json::from_str(s)?;
        description.validate()
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let description: Self = serde_yaml::from_str(s)?;
        description.validate()
    }

    /// Load a description, choosing the format from the file extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!("Loading object description from {}", path.display());

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    fn validate(self) -> Result<Self> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_argument("object description has no name"));
        }

        // Give unnamed interfaces their IID as a name
        let interfaces = self
            .interfaces
            .into_iter()
            .map(|d| InterfaceDescriptor {
                is_dispatch: d.is_dispatch,
                is_ole_control: d.is_ole_control,
                ..InterfaceDescriptor::new(d.iid, d.name)
            })
            .collect();

        Ok(Self { interfaces, ..self })
    }
}

struct DescribedSafety {
    options: Option<SafetyDescription>,
    error: Option<String>,
}

impl ObjectSafety for DescribedSafety {
    fn interface_safety_options(&self, _iid: &Guid) -> Result<(u32, u32)> {
        match (&self.error, self.options) {
            (Some(message), _) => Err(Error::call_failed(message.clone())),
            (None, Some(options)) => Ok((options.supported, options.enabled)),
            (None, None) => Ok((0, 0)),
        }
    }
}

struct DescribedDispatch {
    type_info: Option<TypeInfo>,
    error: Option<String>,
}

impl Dispatch for DescribedDispatch {
    fn type_info(&self) -> Result<TypeInfo> {
        if let Some(message) = &self.error {
            return Err(Error::call_failed(message.clone()));
        }
        self.type_info
            .clone()
            .ok_or_else(|| Error::not_found("no type information"))
    }
}

/// An inspectable object built from an `ObjectDescription`
pub struct DescribedObject {
    name: String,
    properties: PropertyTable,
    interfaces: Vec<InterfaceDescriptor>,
    safety: Option<DescribedSafety>,
    dispatch: Option<DescribedDispatch>,
}

impl DescribedObject {
    pub fn new(description: ObjectDescription) -> Self {
        let safety = (description.safety.is_some() || description.safety_error.is_some()).then(|| {
            DescribedSafety {
                options: description.safety,
                error: description.safety_error,
            }
        });

        let declares_dispatch = description.interfaces.iter().any(|i| i.is_dispatch);
        let dispatch = (declares_dispatch
            || description.type_info.is_some()
            || description.dispatch_error.is_some())
        .then(|| DescribedDispatch {
            type_info: description.type_info,
            error: description.dispatch_error,
        });

        Self {
            name: description.name,
            properties: description.properties,
            interfaces: description.interfaces,
            safety,
            dispatch,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        ObjectDescription::from_path(path).map(Self::new)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    pub fn interfaces(&self) -> &[InterfaceDescriptor] {
        &self.interfaces
    }
}

impl InspectableObject for DescribedObject {
    fn query_interface(&self, iid: &Guid) -> Result<InterfaceRef<'_>> {
        if *iid == IID_IUNKNOWN {
            return Ok(InterfaceRef::Opaque);
        }
        if *iid == IID_IOBJECTSAFETY {
            if let Some(safety) = &self.safety {
                return Ok(InterfaceRef::ObjectSafety(safety));
            }
        }
        if *iid == IID_IDISPATCH {
            if let Some(dispatch) = &self.dispatch {
                return Ok(InterfaceRef::Dispatch(dispatch));
            }
        }
        if self.interfaces.iter().any(|i| i.iid == *iid) {
            return Ok(InterfaceRef::Opaque);
        }
        Err(Error::NoInterface(*iid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CALCULATOR: &str = r#"{
        "name": "Calculator",
        "properties": { "CLSID": "{0002df01-0000-0000-c000-000000000046}", "Server": "calc.exe" },
        "interfaces": [
            { "iid": "{00020400-0000-0000-c000-000000000046}", "name": "IDispatch", "is_dispatch": true },
            { "iid": "{00000000-0000-0000-c000-000000000046}", "name": "" }
        ],
        "safety": { "supported": 3, "enabled": 1 },
        "type_info": { "name": "ICalculator", "members": [ { "dispid": 1, "name": "Add" } ] }
    }"#;

    #[test]
    fn test_json_description() {
        let description = ObjectDescription::from_json_str(CALCULATOR).unwrap();
        assert_eq!(description.name, "Calculator");
        assert_eq!(
            description.properties.keys().collect::<Vec<_>>(),
            vec!["CLSID", "Server"]
        );
        assert!(description.interfaces[0].is_dispatch);
        assert_eq!(
            description.interfaces[1].name,
            "{00000000-0000-0000-c000-000000000046}"
        );
    }

    #[test]
    fn test_yaml_file_description() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "name: Control\ninterfaces:\n  - iid: \"{{00000112-0000-0000-c000-000000000046}}\"\n    name: IOleObject\n    is_ole_control: true\n"
        )
        .unwrap();

        let object = DescribedObject::load(file.path()).unwrap();
        assert_eq!(object.name(), "Control");
        assert!(object.interfaces()[0].is_ole_control);
    }

    #[test]
    fn test_missing_name_rejected() {
        let err = ObjectDescription::from_json_str(r#"{ "name": " " }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_query_interface() {
        let object = DescribedObject::new(ObjectDescription::from_json_str(CALCULATOR).unwrap());

        assert!(matches!(
            object.query_interface(&IID_IOBJECTSAFETY),
            Ok(InterfaceRef::ObjectSafety(_))
        ));
        match object.query_interface(&IID_IDISPATCH) {
            Ok(InterfaceRef::Dispatch(dispatch)) => {
                assert_eq!(dispatch.type_info().unwrap().name, "ICalculator")
            }
            _ => panic!("expected dispatch interface"),
        }

        let unknown: Guid = "{11111111-2222-3333-4444-555555555555}".parse().unwrap();
        assert!(matches!(
            object.query_interface(&unknown),
            Err(Error::NoInterface(iid)) if iid == unknown
        ));
    }

    #[test]
    fn test_safety_error_fails_the_call() {
        let object = DescribedObject::new(ObjectDescription {
            name: "Flaky".to_string(),
            safety_error: Some("E_UNEXPECTED".to_string()),
            ..Default::default()
        });

        let Ok(InterfaceRef::ObjectSafety(safety)) = object.query_interface(&IID_IOBJECTSAFETY)
        else {
            panic!("expected safety interface");
        };
        assert!(safety.interface_safety_options(&IID_IDISPATCH).is_err());
    }

    #[test]
    fn test_no_safety_interface_without_description() {
        let object = DescribedObject::new(ObjectDescription {
            name: "Plain".to_string(),
            ..Default::default()
        });
        assert!(matches!(
            object.query_interface(&IID_IOBJECTSAFETY),
            Err(Error::NoInterface(_))
        ));
    }
}
