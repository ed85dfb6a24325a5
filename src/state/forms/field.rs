//! Form field value objects and inbound/outbound form documents

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Owner type stamped on every field the composer manufactures
pub const FORM_CONTENT_TYPE: &str = "form";

/// Title used when the inbound template has none
pub const DEFAULT_TITLE: &str = "Form Title";

/// Button text used when the inbound template has none
pub const DEFAULT_BUTTON_TEXT: &str = "Send";

/// A single form element.
///
/// Only `id`, `content_type` and `field_type` are understood by the composer.
/// Every other key (label, options, validation, page, order, ...) is kept in
/// `config` and copied through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "contentType", default = "default_content_type")]
    pub content_type: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(flatten)]
    pub config: Map<String, Value>,
}

fn default_content_type() -> String {
    FORM_CONTENT_TYPE.to_string()
}

impl Field {
    /// Create a fresh stub for a field type picked from the palette
    pub fn stub(id: String, field_type: &str) -> Self {
        Self {
            id,
            content_type: FORM_CONTENT_TYPE.to_string(),
            field_type: field_type.to_string(),
            config: Map::new(),
        }
    }
}

#[cfg(test)]
impl Field {
    /// Attach one opaque configuration key
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.config.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }
}

/// Inbound form template handed over by the host on the load path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    pub title: Option<String>,
    pub description: Option<String>,
    pub button_text: Option<String>,
    pub number_of_pages: Option<u32>,
}

/// Form document as persisted by the host, and as handed back on save
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub button_text: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(rename = "type", default)]
    pub form_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_pages: Option<u32>,
}

/// One edit to the form's free-text metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "value", rename_all = "camelCase")]
pub enum MetadataChange {
    Title(String),
    Description(String),
    ButtonText(String),
    NumberOfPages(u32),
}
