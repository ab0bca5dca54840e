use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::values::as_number;

/// A declarative constraint attached to a form field.
///
/// Constraints are pure data so that a product's form definition can be
/// serialized; [`FieldConstraint::check`] interprets them against a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldConstraint {
    /// String must be at least `length` characters.
    MinLength {
        length: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// String must be at most `length` characters.
    MaxLength {
        length: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// String must match the given regex pattern.
    Pattern {
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Numeric value must be >= `value`.
    Min {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Numeric value must be <= `value`.
    Max {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Value must be one of the given allowed values.
    OneOf {
        values: Vec<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl FieldConstraint {
    #[must_use]
    pub fn min_length(length: usize) -> Self {
        Self::MinLength {
            length,
            message: None,
        }
    }

    #[must_use]
    pub fn max_length(length: usize) -> Self {
        Self::MaxLength {
            length,
            message: None,
        }
    }

    #[must_use]
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: None,
        }
    }

    #[must_use]
    pub fn min(value: f64) -> Self {
        Self::Min {
            value,
            message: None,
        }
    }

    #[must_use]
    pub fn max(value: f64) -> Self {
        Self::Max {
            value,
            message: None,
        }
    }

    #[must_use]
    pub fn one_of(values: Vec<serde_json::Value>) -> Self {
        Self::OneOf {
            values,
            message: None,
        }
    }

    /// Require a numeric value within an inclusive range.
    ///
    /// Returns a pair of `[Min, Max]` constraints.
    #[must_use]
    pub fn range(min: f64, max: f64) -> Vec<Self> {
        vec![Self::min(min), Self::max(max)]
    }

    /// Replace the default message with a custom one.
    #[must_use]
    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        let slot = match &mut self {
            Self::MinLength { message, .. }
            | Self::MaxLength { message, .. }
            | Self::Pattern { message, .. }
            | Self::Min { message, .. }
            | Self::Max { message, .. }
            | Self::OneOf { message, .. } => message,
        };
        *slot = Some(text.into());
        self
    }

    /// Check a present value against this constraint.
    ///
    /// `label` is the human-readable field name used in default messages.
    pub fn check(&self, key: &str, label: &str, value: &serde_json::Value) -> Result<(), FieldError> {
        let invalid = |message: &Option<String>, default: String| FieldError::InvalidValue {
            key: key.to_owned(),
            reason: message.clone().unwrap_or(default),
        };

        match self {
            Self::Min { value: min, message } => {
                let n = expect_number(key, label, value)?;
                if n < *min {
                    return Err(invalid(message, format!("{label} deve ser no mínimo {min}")));
                }
            }
            Self::Max { value: max, message } => {
                let n = expect_number(key, label, value)?;
                if n > *max {
                    return Err(invalid(message, format!("{label} deve ser no máximo {max}")));
                }
            }
            Self::MinLength { length, message } => {
                let s = expect_string(key, label, value)?;
                if s.chars().count() < *length {
                    return Err(invalid(
                        message,
                        format!("{label} deve ter pelo menos {length} caracteres"),
                    ));
                }
            }
            Self::MaxLength { length, message } => {
                let s = expect_string(key, label, value)?;
                if s.chars().count() > *length {
                    return Err(invalid(
                        message,
                        format!("{label} deve ter no máximo {length} caracteres"),
                    ));
                }
            }
            Self::Pattern { pattern, message } => {
                let s = expect_string(key, label, value)?;
                let re = regex::Regex::new(pattern).map_err(|e| FieldError::InvalidPattern {
                    key: key.to_owned(),
                    error: e.to_string(),
                })?;
                if !re.is_match(s) {
                    return Err(invalid(message, format!("{label} está em formato inválido")));
                }
            }
            Self::OneOf { values, message } => {
                if !values.contains(value) {
                    return Err(invalid(
                        message,
                        format!("{label} possui um valor não permitido"),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn expect_number(key: &str, label: &str, value: &serde_json::Value) -> Result<f64, FieldError> {
    as_number(value).ok_or_else(|| FieldError::InvalidType {
        key: key.to_owned(),
        label: label.to_owned(),
        expected_type: "number".to_owned(),
    })
}

fn expect_string<'a>(
    key: &str,
    label: &str,
    value: &'a serde_json::Value,
) -> Result<&'a str, FieldError> {
    value.as_str().ok_or_else(|| FieldError::InvalidType {
        key: key.to_owned(),
        label: label.to_owned(),
        expected_type: "string".to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn min_and_max() {
        let min = FieldConstraint::min(1.0);
        assert!(min.check("quantity", "Quantidade", &json!(1)).is_ok());
        assert!(min.check("quantity", "Quantidade", &json!("5")).is_ok());
        let err = min.check("quantity", "Quantidade", &json!(0)).unwrap_err();
        assert_eq!(err.to_string(), "Quantidade deve ser no mínimo 1");

        let max = FieldConstraint::max(10_000.0);
        let err = max.check("quantity", "Quantidade", &json!(10_001)).unwrap_err();
        assert_eq!(err.to_string(), "Quantidade deve ser no máximo 10000");
    }

    #[test]
    fn numeric_constraint_rejects_text() {
        let err = FieldConstraint::min(1.0)
            .check("quantity", "Quantidade", &json!("muitos"))
            .unwrap_err();
        assert_eq!(err.code(), "FIELD_INVALID_TYPE");
    }

    #[test]
    fn length_counts_characters() {
        let min = FieldConstraint::min_length(3);
        assert!(min.check("notes", "Observações", &json!("ção")).is_ok());
        assert!(min.check("notes", "Observações", &json!("ab")).is_err());

        let max = FieldConstraint::max_length(2);
        assert!(max.check("notes", "Observações", &json!("ab")).is_ok());
        assert!(max.check("notes", "Observações", &json!("abc")).is_err());
    }

    #[test]
    fn pattern_match_and_bad_regex() {
        let cnpj = FieldConstraint::pattern(r"^\d{14}$");
        assert!(cnpj.check("cnpj", "CNPJ", &json!("12345678000199")).is_ok());
        let err = cnpj.check("cnpj", "CNPJ", &json!("123")).unwrap_err();
        assert_eq!(err.to_string(), "CNPJ está em formato inválido");

        let broken = FieldConstraint::pattern("(");
        let err = broken.check("cnpj", "CNPJ", &json!("x")).unwrap_err();
        assert_eq!(err.code(), "FIELD_INVALID_PATTERN");
    }

    #[test]
    fn one_of() {
        let c = FieldConstraint::one_of(vec![json!(110), json!(220)]);
        assert!(c.check("voltage", "Tensão", &json!(220)).is_ok());
        assert!(c.check("voltage", "Tensão", &json!(380)).is_err());
    }

    #[test]
    fn custom_message_wins() {
        let c = FieldConstraint::min(1.0).with_message("Informe ao menos uma unidade");
        let err = c.check("quantity", "Quantidade", &json!(0)).unwrap_err();
        assert_eq!(err.to_string(), "Informe ao menos uma unidade");
    }

    #[test]
    fn range_creates_min_and_max() {
        let rules = FieldConstraint::range(1.0, 90.0);
        assert_eq!(rules, vec![FieldConstraint::min(1.0), FieldConstraint::max(90.0)]);
    }

    #[test]
    fn serde_tagged_shape() {
        let rule = FieldConstraint::min_length(5).with_message("curto demais");
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"rule\":\"min_length\""));
        assert!(json.contains("\"message\":\"curto demais\""));

        let back: FieldConstraint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }
}
