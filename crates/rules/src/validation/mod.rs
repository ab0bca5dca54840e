//! Validation engine: rules that accept or reject the current form state.

mod rules;

pub use rules::{CertificationRequiredRule, DeliveryTimeRule, MinimumQuantityRule};

use serde::{Deserialize, Serialize};

use crate::context::RuleContext;
use crate::engine::RulesEngine;
use crate::result::EngineExecutionResult;
use crate::rule::ValidationRule;

/// Outcome of [`ValidationEngine::validate_all`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub messages: Vec<String>,
}

impl ValidationResult {
    /// A passing result with no messages.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            ..Self::default()
        }
    }
}

impl From<EngineExecutionResult> for ValidationResult {
    fn from(execution: EngineExecutionResult) -> Self {
        Self {
            is_valid: execution.errors.is_empty(),
            errors: execution.errors,
            messages: execution.messages,
        }
    }
}

/// Rules engine specialized for validation rules.
#[derive(Debug, Default)]
pub struct ValidationEngine {
    engine: RulesEngine<dyn ValidationRule>,
}

impl ValidationEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, rule: impl ValidationRule + 'static) {
        self.engine.add_rule(Box::new(rule));
    }

    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Box<dyn ValidationRule>>) {
        self.engine.add_rules(rules);
    }

    pub fn remove_rule(&mut self, id: &str) -> bool {
        self.engine.remove_rule(id)
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.engine.rule_count()
    }

    pub fn rules(&self) -> impl Iterator<Item = &(dyn ValidationRule + 'static)> {
        self.engine.rules()
    }

    pub fn execute(&self, context: RuleContext) -> EngineExecutionResult {
        self.engine.execute(context)
    }

    /// Run every applicable validation rule and report validity.
    pub fn validate_all(&self, context: RuleContext) -> ValidationResult {
        self.engine.execute(context).into()
    }
}
