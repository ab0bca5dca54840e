use serde::{Deserialize, Serialize};

/// A single choice in a select or multi-select field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Human-readable display label.
    pub label: String,

    /// The value stored in the form when this option is selected.
    pub value: serde_json::Value,

    /// Optional help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SelectOption {
    #[must_use]
    pub fn new(label: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            label: label.into(),
            value,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
