use indexmap::IndexMap;
use quoteform_field::values::ValueMap;
use serde::{Deserialize, Serialize};

use crate::context::RuleContext;

/// Outcome of a single rule execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Written into the context's calculated data when the rule succeeds.
    #[serde(default)]
    pub changes: ValueMap,
    /// Non-empty only on failure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Halt the remaining rules of the current pass.
    #[serde(default)]
    pub should_stop_execution: bool,
}

impl RuleResult {
    /// A successful outcome carrying an optional message and the changes to
    /// publish to later rules.
    #[must_use]
    pub fn success(message: Option<String>, changes: ValueMap) -> Self {
        Self {
            success: true,
            message,
            changes,
            errors: Vec::new(),
            should_stop_execution: false,
        }
    }

    /// A failed outcome.
    #[must_use]
    pub fn failure(errors: Vec<String>, should_stop_execution: bool) -> Self {
        Self {
            success: false,
            message: None,
            changes: ValueMap::new(),
            errors,
            should_stop_execution,
        }
    }

    /// Shorthand for a success without message or changes.
    #[must_use]
    pub fn ok() -> Self {
        Self::success(None, ValueMap::new())
    }

    /// Ask the engine to stop after this result (builder-style, consuming).
    #[must_use]
    pub fn stop_execution(mut self) -> Self {
        self.should_stop_execution = true;
        self
    }
}

/// Aggregated outcome of one engine pass.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineExecutionResult {
    /// True iff no errors were collected.
    pub success: bool,
    /// Result of every rule that ran, keyed by rule id, in execution order.
    pub results: IndexMap<String, RuleResult>,
    pub errors: Vec<String>,
    pub messages: Vec<String>,
    /// Union of every successful rule's changes.
    pub changes: ValueMap,
    /// The context after the pass, including merged calculated data.
    pub context: RuleContext,
}

impl EngineExecutionResult {
    /// An empty, successful result over the given context.
    #[must_use]
    pub fn new(context: RuleContext) -> Self {
        Self {
            success: true,
            results: IndexMap::new(),
            errors: Vec::new(),
            messages: Vec::new(),
            changes: ValueMap::new(),
            context,
        }
    }

    /// Ids of the rules that ran, in execution order.
    pub fn executed_rule_ids(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    /// Results of the rules that succeeded, in execution order.
    pub fn successful(&self) -> impl Iterator<Item = (&str, &RuleResult)> {
        self.results
            .iter()
            .filter(|(_, r)| r.success)
            .map(|(id, r)| (id.as_str(), r))
    }
}
