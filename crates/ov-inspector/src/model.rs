//! Display model handed to the presentation layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the property table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRow {
    pub key: String,
    pub value: String,
}

impl PropertyRow {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One row of the interface table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRow {
    pub name: String,
    /// Braced canonical IID
    pub iid: String,
    /// A registered viewer handles this interface
    pub viewable: bool,
}

impl InterfaceRow {
    /// Text for the "Viewer" column
    pub fn viewer_column(&self) -> &'static str {
        if self.viewable {
            "Yes"
        } else {
            "No"
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayModel {
    pub session_id: Uuid,
    pub name: String,
    pub opened_at: DateTime<Utc>,
    pub properties: Vec<PropertyRow>,
    pub interfaces: Vec<InterfaceRow>,
    /// Enables the typed dispatch viewer
    pub dispatch_enabled: bool,
    /// Enables the control container viewer
    pub control_container_enabled: bool,
}

impl DisplayModel {
    /// Plain-text rendering with aligned columns
    pub fn render_text(&self) -> String {
        let mut out = format!("{}\n", self.name);

        let key_width = self.properties.iter().map(|p| p.key.len()).max().unwrap_or(0);
        out.push_str("\nProperties:\n");
        for row in &self.properties {
            out.push_str(&format!("  {:width$}  {}\n", row.key, row.value, width = key_width));
        }

        let name_width = self.interfaces.iter().map(|i| i.name.len()).max().unwrap_or(0);
        out.push_str("\nInterfaces:\n");
        for row in &self.interfaces {
            out.push_str(&format!(
                "  {:width$}  {}  {}\n",
                row.name,
                row.iid,
                row.viewer_column(),
                width = name_width
            ));
        }

        out.push_str(&format!(
            "\nDispatch viewer: {}  Control container: {}\n",
            on_off(self.dispatch_enabled),
            on_off(self.control_container_enabled)
        ));
        out
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}
