use serde::{Deserialize, Serialize};

use crate::constraint::FieldConstraint;
use crate::error::FieldError;
use crate::kind::FieldKind;
use crate::option::SelectOption;
use crate::values::{as_number, is_filled};

/// Configuration of one input in a product's quote form.
///
/// Field configs are values: visibility rules never mutate a config in
/// place, they produce a modified copy through the `with_*` methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormFieldConfig {
    /// Key under which the field's value is stored in the form data.
    pub key: String,

    /// Human-readable label.
    pub label: String,

    #[serde(default)]
    pub kind: FieldKind,

    /// Whether the user must provide a value.
    #[serde(default)]
    pub required: bool,

    /// Whether the field is currently shown.
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Position in the rendered form; lower comes first.
    #[serde(default)]
    pub order: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// Choices for select and multi-select fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<FieldConstraint>,
}

fn default_visible() -> bool {
    true
}

impl FormFieldConfig {
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            required: false,
            visible: true,
            order: 0,
            placeholder: None,
            hint: None,
            options: Vec::new(),
            constraints: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options.extend(options);
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: FieldConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    #[must_use]
    pub fn with_constraints(mut self, constraints: impl IntoIterator<Item = FieldConstraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Validate the field's current value.
    ///
    /// Absent, null and blank values only fail when the field is required.
    /// A required checkbox must be checked.
    pub fn validate(&self, value: Option<&serde_json::Value>) -> Result<(), FieldError> {
        let Some(value) = value.filter(|v| is_filled(v)) else {
            return if self.required {
                Err(self.missing())
            } else {
                Ok(())
            };
        };

        match self.kind {
            FieldKind::Checkbox => {
                let checked = value.as_bool().ok_or_else(|| self.wrong_type())?;
                if self.required && !checked {
                    return Err(self.missing());
                }
            }
            FieldKind::Number => {
                as_number(value).ok_or_else(|| self.wrong_type())?;
            }
            FieldKind::Select if !self.options.is_empty() => {
                if !self.options.iter().any(|o| same_value(&o.value, value)) {
                    return Err(self.not_an_option());
                }
            }
            FieldKind::MultiSelect => {
                let items = value.as_array().ok_or_else(|| self.wrong_type())?;
                if !self.options.is_empty()
                    && !items
                        .iter()
                        .all(|item| self.options.iter().any(|o| same_value(&o.value, item)))
                {
                    return Err(self.not_an_option());
                }
            }
            _ => {}
        }

        for constraint in &self.constraints {
            constraint.check(&self.key, &self.label, value)?;
        }
        Ok(())
    }

    fn missing(&self) -> FieldError {
        FieldError::MissingValue {
            key: self.key.clone(),
            label: self.label.clone(),
        }
    }

    fn wrong_type(&self) -> FieldError {
        FieldError::InvalidType {
            key: self.key.clone(),
            label: self.label.clone(),
            expected_type: self.kind.value_type().to_owned(),
        }
    }

    fn not_an_option(&self) -> FieldError {
        FieldError::InvalidValue {
            key: self.key.clone(),
            reason: format!("{} possui uma opção inválida", self.label),
        }
    }
}

/// Option values are compared numerically when both sides are numbers, so
/// `"220"` typed into a form matches an option declared as `220`.
fn same_value(option: &serde_json::Value, value: &serde_json::Value) -> bool {
    if option == value {
        return true;
    }
    match (as_number(option), as_number(value)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Stable sort of field configs by their `order`.
pub fn sort_by_order(fields: &mut [FormFieldConfig]) {
    fields.sort_by_key(|f| f.order);
}
