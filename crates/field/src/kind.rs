use serde::{Deserialize, Serialize};

/// The kind of a form field, determining its input widget and value semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Textarea,
    Number,
    Checkbox,
    Select,
    MultiSelect,
    Date,
}

impl FieldKind {
    /// String identifier for serialization/logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Date => "date",
        }
    }

    /// The JSON value type this field expects.
    #[must_use]
    pub fn value_type(&self) -> &'static str {
        match self {
            Self::Text | Self::Textarea | Self::Date => "string",
            Self::Number => "number",
            Self::Checkbox => "boolean",
            Self::Select => "any",
            Self::MultiSelect => "array",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
