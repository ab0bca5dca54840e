//! Rule execution errors.

/// An unexpected fault raised while a rule executes.
///
/// Rules never surface business failures through this type; those are a
/// [`RuleResult::failure`](crate::result::RuleResult::failure). A `RuleError`
/// means the rule could not run at all, and the engine turns it into an
/// aggregated error string instead of aborting the pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// A value the rule depends on is absent from the context.
    #[error("valor ausente: `{key}`")]
    MissingValue { key: String },

    /// A value is present but cannot be interpreted.
    #[error("valor inválido para `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Anything else that prevented the rule from finishing.
    #[error("{0}")]
    Evaluation(String),
}

impl RuleError {
    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::MissingValue { .. } => "RULE_MISSING_VALUE",
            Self::InvalidValue { .. } => "RULE_INVALID_VALUE",
            Self::Evaluation(_) => "RULE_EVALUATION",
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::MissingValue { .. } | Self::InvalidValue { .. } => "value",
            Self::Evaluation(_) => "evaluation",
        }
    }
}
