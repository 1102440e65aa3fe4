//! Built-in viewers

use anyhow::Result;
use ov_core::guid::IID_IOBJECTSAFETY;
use ov_core::{ObjectRef, SafetyCapabilities, SafetyOptions};
use ov_introspection::SafetyCapabilityProbe;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::registry::ViewerRegistry;
use crate::viewer::{Viewer, ViewerFactory, ViewerHandle};

/// Shows the safety options an object reports
pub struct ObjectSafetyViewer {
    title: String,
    object: ObjectRef,
    caps: SafetyCapabilities,
}

impl ObjectSafetyViewer {
    pub fn capabilities(&self) -> SafetyCapabilities {
        self.caps
    }
}

fn option_names(options: SafetyOptions) -> Vec<&'static str> {
    options.iter_names().map(|(name, _)| name).collect()
}

impl Viewer for ObjectSafetyViewer {
    fn title(&self) -> &str {
        &self.title
    }

    fn kind(&self) -> &'static str {
        "object-safety"
    }

    fn object(&self) -> &ObjectRef {
        &self.object
    }

    fn render(&self) -> Value {
        json!({
            "supported": option_names(self.caps.supported()),
            "enabled": option_names(self.caps.enabled()),
        })
    }
}

#[derive(Debug, Default)]
pub struct ObjectSafetyViewerFactory {
    probe: SafetyCapabilityProbe,
}

impl ViewerFactory for ObjectSafetyViewerFactory {
    fn name(&self) -> &str {
        "IObjectSafety"
    }

    fn create(&self, name: &str, object: ObjectRef) -> Result<ViewerHandle> {
        // Unlike session probing, a missing safety interface fails here.
        let caps = self.probe.probe(&*object)?;
        Ok(Box::new(ObjectSafetyViewer {
            title: format!("{} IObjectSafety", name),
            object,
            caps,
        }))
    }
}

/// Register the viewers that ship with oview
pub fn register_builtin_viewers(registry: &ViewerRegistry) {
    registry.register(IID_IOBJECTSAFETY, Arc::new(ObjectSafetyViewerFactory::default()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ov_introspection::{DescribedObject, ObjectDescription, SafetyDescription};

    fn object(safety: Option<SafetyDescription>) -> ObjectRef {
        Arc::new(DescribedObject::new(ObjectDescription {
            name: "Control".to_string(),
            safety,
            ..Default::default()
        }))
    }

    #[test]
    fn test_builtin_registration() {
        let registry = ViewerRegistry::new();
        register_builtin_viewers(&registry);
        assert!(registry.can_view(&IID_IOBJECTSAFETY));
    }

    #[test]
    fn test_safety_viewer_renders_options() {
        let factory = ObjectSafetyViewerFactory::default();
        let viewer = factory
            .create(
                "Control",
                object(Some(SafetyDescription {
                    supported: 0b0011,
                    enabled: 0b0010,
                })),
            )
            .unwrap();

        assert_eq!(viewer.title(), "Control IObjectSafety");
        assert_eq!(
            viewer.render(),
            json!({
                "supported": ["INTERFACESAFE_FOR_UNTRUSTED_CALLER", "INTERFACESAFE_FOR_UNTRUSTED_DATA"],
                "enabled": ["INTERFACESAFE_FOR_UNTRUSTED_DATA"],
            })
        );
    }

    #[test]
    fn test_safety_viewer_fails_without_interface() {
        let factory = ObjectSafetyViewerFactory::default();
        assert!(factory.create("Control", object(None)).is_err());
    }
}
