/// Error type for field-level checks.
///
/// `Display` renders the user-facing message shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// A required field has no value.
    #[error("{label} é obrigatório")]
    MissingValue { key: String, label: String },

    /// Value type does not match the field kind.
    #[error("{label} deve ser do tipo {expected_type}")]
    InvalidType {
        key: String,
        label: String,
        expected_type: String,
    },

    /// Value is present but breaks one of the field's constraints.
    #[error("{reason}")]
    InvalidValue { key: String, reason: String },

    /// A pattern constraint holds a regex that does not compile.
    #[error("padrão inválido para `{key}`: {error}")]
    InvalidPattern { key: String, error: String },
}

impl FieldError {
    /// The key of the field this error belongs to.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::MissingValue { key, .. }
            | Self::InvalidType { key, .. }
            | Self::InvalidValue { key, .. }
            | Self::InvalidPattern { key, .. } => key,
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::MissingValue { .. } | Self::InvalidValue { .. } => "value",
            Self::InvalidType { .. } => "type",
            Self::InvalidPattern { .. } => "format",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::MissingValue { .. } => "FIELD_MISSING_VALUE",
            Self::InvalidType { .. } => "FIELD_INVALID_TYPE",
            Self::InvalidValue { .. } => "FIELD_INVALID_VALUE",
            Self::InvalidPattern { .. } => "FIELD_INVALID_PATTERN",
        }
    }
}
