//! Viewers intrinsic to the object model
//!
//! The dispatch and control-container viewers are not looked up in the
//! registry; the session builds them directly.

use ov_core::guid::{IID_IDISPATCH, IID_IOLEOBJECT};
use ov_core::{Error, InterfaceRef, ObjectRef, Result, TypeInfo};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::viewer::{Viewer, ViewerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialViewer {
    /// Typed view over late-bound automation
    Dispatch,
    /// Host the object as an embedded control
    ControlContainer,
}

impl fmt::Display for SpecialViewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialViewer::Dispatch => write!(f, "dispatch"),
            SpecialViewer::ControlContainer => write!(f, "control container"),
        }
    }
}

/// Members of an object read through its dispatch type information
pub struct TypedObjectViewer {
    title: String,
    object: ObjectRef,
    type_info: TypeInfo,
}

impl TypedObjectViewer {
    pub fn new(name: &str, object: ObjectRef) -> Result<Self> {
        let type_info = match object.query_interface(&IID_IDISPATCH)? {
            InterfaceRef::Dispatch(dispatch) => dispatch.type_info()?,
            other => {
                return Err(Error::call_failed(format!(
                    "dispatch query returned a {} interface",
                    other.kind()
                )))
            }
        };

        Ok(Self {
            title: format!("{} {}", name, type_info.name),
            object,
            type_info,
        })
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }
}

impl Viewer for TypedObjectViewer {
    fn title(&self) -> &str {
        &self.title
    }

    fn kind(&self) -> &'static str {
        "typed-object"
    }

    fn object(&self) -> &ObjectRef {
        &self.object
    }

    fn render(&self) -> Value {
        json!({
            "type": self.type_info.name,
            "members": self.type_info.members,
        })
    }
}

/// Hosts an object as an embedded control
pub struct ObjectContainerViewer {
    title: String,
    object: ObjectRef,
}

impl ObjectContainerViewer {
    pub fn new(name: &str, object: ObjectRef) -> Self {
        Self {
            title: format!("{} Container", name),
            object,
        }
    }

    /// Whether the hosted object answers the embedding interface
    pub fn is_embeddable(&self) -> bool {
        self.object.query_interface(&IID_IOLEOBJECT).is_ok()
    }
}

impl Viewer for ObjectContainerViewer {
    fn title(&self) -> &str {
        &self.title
    }

    fn kind(&self) -> &'static str {
        "object-container"
    }

    fn object(&self) -> &ObjectRef {
        &self.object
    }

    fn render(&self) -> Value {
        json!({
            "container": self.title,
            "embeddable": self.is_embeddable(),
        })
    }
}

/// Build one of the intrinsic viewers
pub fn create_special_viewer(kind: SpecialViewer, name: &str, object: ObjectRef) -> Result<ViewerHandle> {
    match kind {
        SpecialViewer::Dispatch => TypedObjectViewer::new(name, object)
            .map(|v| Box::new(v) as ViewerHandle)
            .map_err(|e| Error::viewer_construction(kind.to_string(), e)),
        SpecialViewer::ControlContainer => Ok(Box::new(ObjectContainerViewer::new(name, object))),
    }
}
