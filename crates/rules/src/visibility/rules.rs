use std::collections::{BTreeMap, BTreeSet, HashMap};

use quoteform_field::config::FormFieldConfig;
use quoteform_field::values::as_number;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RuleContext;
use crate::error::RuleError;
use crate::keys;
use crate::result::RuleResult;
use crate::rule::{Rule, RuleCategory, RuleInfo, VisibilityRule};

/// How a trigger field's value is compared.
///
/// Parsed from the configured trigger value: the strings `">N"` and `"<N"`
/// are numeric thresholds, anything else is compared for equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum TriggerCondition {
    GreaterThan(f64),
    LessThan(f64),
    Equals(Value),
}

impl TriggerCondition {
    #[must_use]
    pub fn parse(trigger: &Value) -> Self {
        if let Value::String(s) = trigger {
            let s = s.trim();
            if let Some(n) = s.strip_prefix('>').and_then(|n| n.trim().parse().ok()) {
                return Self::GreaterThan(n);
            }
            if let Some(n) = s.strip_prefix('<').and_then(|n| n.trim().parse().ok()) {
                return Self::LessThan(n);
            }
        }
        Self::Equals(trigger.clone())
    }

    /// Whether `value` satisfies the condition. A missing value never does.
    #[must_use]
    pub fn matches(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Self::GreaterThan(n) => as_number(value).is_some_and(|v| v > *n),
            Self::LessThan(n) => as_number(value).is_some_and(|v| v < *n),
            Self::Equals(expected) => {
                expected == value
                    || matches!(
                        (as_number(expected), as_number(value)),
                        (Some(a), Some(b)) if (a - b).abs() < f64::EPSILON
                    )
            }
        }
    }
}

/// Shows, hides, requires or un-requires target fields while a trigger
/// field's value matches.
#[derive(Debug, Clone)]
pub struct ConditionalVisibilityRule {
    info: RuleInfo,
    pub trigger_field: String,
    pub condition: TriggerCondition,
    pub target_fields: Vec<String>,
    pub visible: Option<bool>,
    pub required: Option<bool>,
}

impl ConditionalVisibilityRule {
    #[must_use]
    pub fn new<I, S>(
        id: impl Into<String>,
        trigger_field: impl Into<String>,
        trigger_value: Value,
        target_fields: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let trigger_field = trigger_field.into();
        Self {
            info: RuleInfo::new(id, "Visibilidade condicional")
                .with_description(format!("Depende do campo {trigger_field}"))
                .with_priority(50),
            condition: TriggerCondition::parse(&trigger_value),
            trigger_field,
            target_fields: target_fields.into_iter().map(Into::into).collect(),
            visible: None,
            required: None,
        }
    }

    #[must_use]
    pub fn show(mut self) -> Self {
        self.visible = Some(true);
        self
    }

    #[must_use]
    pub fn hide(mut self) -> Self {
        self.visible = Some(false);
        self
    }

    #[must_use]
    pub fn require(mut self) -> Self {
        self.required = Some(true);
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }
}

crate::rule_builders!(ConditionalVisibilityRule);

impl Rule for ConditionalVisibilityRule {
    fn info(&self) -> &RuleInfo {
        &self.info
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Visibility
    }

    fn is_applicable(&self, context: &RuleContext) -> bool {
        self.info.is_active_for(context)
            && self
                .condition
                .matches(context.form_value(&self.trigger_field))
    }

    fn execute(&self, _context: &RuleContext) -> Result<RuleResult, RuleError> {
        Ok(RuleResult::ok())
    }
}

impl VisibilityRule for ConditionalVisibilityRule {
    fn apply_visibility_changes(
        &self,
        fields: &[FormFieldConfig],
        _context: &RuleContext,
    ) -> HashMap<String, FormFieldConfig> {
        fields
            .iter()
            .filter(|f| self.target_fields.contains(&f.key))
            .map(|f| {
                let mut field = f.clone();
                if let Some(visible) = self.visible {
                    field.visible = visible;
                }
                if let Some(required) = self.required {
                    field.required = required;
                }
                (field.key.clone(), field)
            })
            .collect()
    }
}

/// Limits the visible fields to an allow-list per product type.
///
/// `quantity` stays visible whatever the allow-list says.
#[derive(Debug, Clone)]
pub struct ProductTypeVisibilityRule {
    info: RuleInfo,
    pub visible_fields: BTreeMap<String, BTreeSet<String>>,
}

impl ProductTypeVisibilityRule {
    #[must_use]
    pub fn new<M, T, I, S>(id: impl Into<String>, visible_fields: M) -> Self
    where
        M: IntoIterator<Item = (T, I)>,
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            info: RuleInfo::new(id, "Campos por tipo de produto").with_priority(100),
            visible_fields: visible_fields
                .into_iter()
                .map(|(t, keys)| (t.into(), keys.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }
}

crate::rule_builders!(ProductTypeVisibilityRule);

impl Rule for ProductTypeVisibilityRule {
    fn info(&self) -> &RuleInfo {
        &self.info
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Visibility
    }

    fn is_applicable(&self, context: &RuleContext) -> bool {
        self.info.is_active_for(context)
            && context
                .product_type()
                .is_some_and(|t| self.visible_fields.contains_key(t))
    }

    fn execute(&self, _context: &RuleContext) -> Result<RuleResult, RuleError> {
        Ok(RuleResult::ok())
    }
}

impl VisibilityRule for ProductTypeVisibilityRule {
    fn apply_visibility_changes(
        &self,
        fields: &[FormFieldConfig],
        context: &RuleContext,
    ) -> HashMap<String, FormFieldConfig> {
        let Some(allowed) = context
            .product_type()
            .and_then(|t| self.visible_fields.get(t))
        else {
            return HashMap::new();
        };

        fields
            .iter()
            .map(|f| {
                let visible = f.key == keys::QUANTITY || allowed.contains(&f.key);
                (f.key.clone(), f.clone().with_visible(visible))
            })
            .collect()
    }
}
