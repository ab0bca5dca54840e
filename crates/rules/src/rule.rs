use std::collections::{BTreeSet, HashMap};

use quoteform_field::config::FormFieldConfig;
use quoteform_field::values::ValueMap;
use serde::{Deserialize, Serialize};

use crate::context::RuleContext;
use crate::error::RuleError;
use crate::result::RuleResult;

/// The three families of rules. Each engine holds rules of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Pricing,
    Validation,
    Visibility,
}

impl RuleCategory {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pricing => "pricing",
            Self::Validation => "validation",
            Self::Visibility => "visibility",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and scheduling data shared by every rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleInfo {
    /// Unique within one engine. Engines do not deduplicate.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Higher runs first.
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Product type tags this rule is limited to. Empty means every type.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub applicable_product_types: BTreeSet<String>,
    /// Free-form settings; carried along but not interpreted by the engine.
    #[serde(default, skip_serializing_if = "ValueMap::is_empty")]
    pub conditions: ValueMap,
}

fn enabled_by_default() -> bool {
    true
}

impl RuleInfo {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            priority: 0,
            enabled: true,
            applicable_product_types: BTreeSet::new(),
            conditions: ValueMap::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Restrict the rule to the given product types.
    #[must_use]
    pub fn for_product_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applicable_product_types
            .extend(types.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_condition(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.conditions.set(key, value);
        self
    }

    /// Whether the rule targets the given product type.
    #[must_use]
    pub fn applies_to_product_type(&self, product_type: Option<&str>) -> bool {
        if self.applicable_product_types.is_empty() {
            return true;
        }
        product_type.is_some_and(|t| self.applicable_product_types.contains(t))
    }

    /// The checks common to every rule: enabled and matching product type.
    #[must_use]
    pub fn is_active_for(&self, context: &RuleContext) -> bool {
        self.enabled && self.applies_to_product_type(context.product_type())
    }
}

/// A named, prioritized, conditionally applicable unit of business logic.
///
/// Implementors provide their [`RuleInfo`], their category and the two
/// evaluation steps. `is_applicable` should start from
/// [`RuleInfo::is_active_for`] and add rule-specific conditions.
pub trait Rule: Send + Sync {
    fn info(&self) -> &RuleInfo;

    fn category(&self) -> RuleCategory;

    fn id(&self) -> &str {
        &self.info().id
    }

    fn name(&self) -> &str {
        &self.info().name
    }

    fn priority(&self) -> i32 {
        self.info().priority
    }

    fn is_applicable(&self, context: &RuleContext) -> bool {
        self.info().is_active_for(context)
    }

    /// Run the rule.
    ///
    /// Business outcomes are expressed through the returned [`RuleResult`];
    /// `Err` is reserved for faults that kept the rule from running.
    fn execute(&self, context: &RuleContext) -> Result<RuleResult, RuleError>;
}

/// A rule that contributes price adjustments through its changes.
pub trait PricingRule: Rule {}

/// A rule that accepts or rejects the current form state.
pub trait ValidationRule: Rule {}

/// A rule that shows, hides, requires or un-requires form fields.
pub trait VisibilityRule: Rule {
    /// Field key → replacement config for every field this rule changes.
    fn apply_visibility_changes(
        &self,
        fields: &[FormFieldConfig],
        context: &RuleContext,
    ) -> HashMap<String, FormFieldConfig>;
}

/// Builder methods for concrete rules that keep their identity in an
/// `info: RuleInfo` field.
#[macro_export]
macro_rules! rule_builders {
    ($rule:ty) => {
        impl $rule {
            #[must_use]
            pub fn with_id(mut self, id: impl Into<String>) -> Self {
                self.info.id = id.into();
                self
            }

            #[must_use]
            pub fn with_name(mut self, name: impl Into<String>) -> Self {
                self.info.name = name.into();
                self
            }

            #[must_use]
            pub fn with_priority(mut self, priority: i32) -> Self {
                self.info.priority = priority;
                self
            }

            #[must_use]
            pub fn with_enabled(mut self, enabled: bool) -> Self {
                self.info.enabled = enabled;
                self
            }

            #[must_use]
            pub fn for_product_types<I, S>(mut self, types: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.info = self.info.for_product_types(types);
                self
            }
        }
    };
}
