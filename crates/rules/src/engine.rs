//! Generic priority-ordered rules engine.
//!
//! Rules run in strictly descending priority; rules with equal priority run
//! in insertion order. Each rule sees the calculated data published by the
//! rules that ran before it in the same pass.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, trace, warn};

use crate::context::RuleContext;
use crate::result::{EngineExecutionResult, RuleResult};
use crate::rule::Rule;

/// An ordered collection of rules of one category.
pub struct RulesEngine<R: Rule + ?Sized> {
    rules: Vec<Box<R>>,
}

impl<R: Rule + ?Sized> Default for RulesEngine<R> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<R: Rule + ?Sized> std::fmt::Debug for RulesEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RulesEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| (r.id(), r.priority()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<R: Rule + ?Sized> RulesEngine<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule and re-sort.
    pub fn add_rule(&mut self, rule: Box<R>) {
        self.rules.push(rule);
        self.sort();
    }

    /// Add several rules with a single re-sort.
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Box<R>>) {
        self.rules.extend(rules);
        self.sort();
    }

    /// Remove every rule with the given id. Returns whether any was removed.
    pub fn remove_rule(&mut self, id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id() != id);
        self.rules.len() != before
    }

    /// Remove all rules.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Rules in execution order.
    pub fn rules(&self) -> impl Iterator<Item = &R> {
        self.rules.iter().map(AsRef::as_ref)
    }

    /// Look up a rule by id.
    #[must_use]
    pub fn rule(&self, id: &str) -> Option<&R> {
        self.rules.iter().find(|r| r.id() == id).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    // `sort_by` is stable, so equal priorities keep insertion order.
    fn sort(&mut self) {
        self.rules.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Run one pass over every applicable rule.
    ///
    /// Never fails: a rule that returns `Err` or panics is recorded as an
    /// error string and the pass continues. A result with
    /// `should_stop_execution` ends the pass right after it is recorded.
    #[tracing::instrument(level = "debug", skip_all, fields(rules = self.rules.len()))]
    pub fn execute(&self, mut context: RuleContext) -> EngineExecutionResult {
        let mut outcome = EngineExecutionResult::new(RuleContext::new());

        for rule in &self.rules {
            if !rule.is_applicable(&context) {
                trace!(rule = rule.id(), "rule not applicable");
                continue;
            }

            let result = match run_guarded(rule.as_ref(), &context) {
                Ok(result) => result,
                Err(cause) => {
                    let error = format!("Erro ao executar regra {}: {cause}", rule.name());
                    warn!(rule = rule.id(), %cause, "rule execution faulted");
                    outcome.errors.push(error.clone());
                    outcome
                        .results
                        .insert(rule.id().to_owned(), RuleResult::failure(vec![error], false));
                    continue;
                }
            };

            debug!(
                rule = rule.id(),
                priority = rule.priority(),
                success = result.success,
                changes = result.changes.len(),
                "rule executed"
            );

            if result.success {
                if let Some(message) = &result.message {
                    outcome.messages.push(message.clone());
                }
                outcome.changes.extend_from(&result.changes);
                context.merge_calculated(&result.changes);
            } else {
                outcome.errors.extend(result.errors.iter().cloned());
            }

            let stop = result.should_stop_execution;
            outcome.results.insert(rule.id().to_owned(), result);
            if stop {
                debug!(rule = rule.id(), "rule stopped the pass");
                break;
            }
        }

        outcome.success = outcome.errors.is_empty();
        outcome.context = context;
        outcome
    }
}

fn run_guarded<R: Rule + ?Sized>(rule: &R, context: &RuleContext) -> Result<RuleResult, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.execute(context))) {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(err)) => Err(err.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "falha inesperada".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::rule::{RuleCategory, RuleInfo};
    use quoteform_field::values::ValueMap;
    use serde_json::json;

    enum Behavior {
        Publish(&'static str, serde_json::Value),
        Fail(&'static str, bool),
        Fault,
        Panic,
        ReadPrevious(&'static str),
    }

    struct TestRule {
        info: RuleInfo,
        behavior: Behavior,
    }

    impl TestRule {
        fn boxed(id: &str, priority: i32, behavior: Behavior) -> Box<dyn Rule> {
            Box::new(Self {
                info: RuleInfo::new(id, format!("Regra {id}")).with_priority(priority),
                behavior,
            })
        }
    }

    impl Rule for TestRule {
        fn info(&self) -> &RuleInfo {
            &self.info
        }

        fn category(&self) -> RuleCategory {
            RuleCategory::Pricing
        }

        fn execute(&self, context: &RuleContext) -> Result<RuleResult, RuleError> {
            match &self.behavior {
                Behavior::Publish(key, value) => Ok(RuleResult::success(
                    Some(format!("{} ok", self.info.id)),
                    ValueMap::new().with(*key, value.clone()),
                )),
                Behavior::Fail(msg, stop) => Ok(RuleResult::failure(vec![(*msg).into()], *stop)),
                Behavior::Fault => Err(RuleError::Evaluation("tabela indisponível".into())),
                Behavior::Panic => panic!("divisão por zero"),
                Behavior::ReadPrevious(key) => {
                    let seen = context.calculated_data().get(key).cloned();
                    Ok(RuleResult::success(
                        None,
                        ValueMap::new().with("seen", seen.unwrap_or(json!(null))),
                    ))
                }
            }
        }
    }

    fn ids(result: &EngineExecutionResult) -> Vec<&str> {
        result.executed_rule_ids().collect()
    }

    #[test]
    fn runs_in_descending_priority_with_stable_ties() {
        let mut engine: RulesEngine<dyn Rule> = RulesEngine::new();
        engine.add_rule(TestRule::boxed("low", 1, Behavior::Publish("a", json!(1))));
        engine.add_rule(TestRule::boxed("tie_first", 5, Behavior::Publish("b", json!(1))));
        engine.add_rule(TestRule::boxed("high", 10, Behavior::Publish("c", json!(1))));
        engine.add_rule(TestRule::boxed("tie_second", 5, Behavior::Publish("d", json!(1))));

        let result = engine.execute(RuleContext::new());
        assert_eq!(ids(&result), vec!["high", "tie_first", "tie_second", "low"]);
        assert!(result.success);
        assert_eq!(result.messages.len(), 4);
    }

    #[test]
    fn later_rules_see_earlier_changes() {
        let mut engine: RulesEngine<dyn Rule> = RulesEngine::new();
        engine.add_rules([
            TestRule::boxed("reader", 1, Behavior::ReadPrevious("subtotal")),
            TestRule::boxed("writer", 2, Behavior::Publish("subtotal", json!(42))),
        ]);

        let result = engine.execute(RuleContext::new());
        assert_eq!(result.changes.get("seen"), Some(&json!(42)));
        assert_eq!(result.context.calculated_data().get("subtotal"), Some(&json!(42)));
    }

    #[test]
    fn failure_collects_errors_without_stopping() {
        let mut engine: RulesEngine<dyn Rule> = RulesEngine::new();
        engine.add_rules([
            TestRule::boxed("fails", 2, Behavior::Fail("inválido", false)),
            TestRule::boxed("after", 1, Behavior::Publish("x", json!(1))),
        ]);

        let result = engine.execute(RuleContext::new());
        assert!(!result.success);
        assert_eq!(result.errors, vec!["inválido".to_owned()]);
        assert_eq!(ids(&result), vec!["fails", "after"]);
        assert!(result.context.calculated_data().contains("x"));
    }

    #[test]
    fn stop_execution_halts_the_pass() {
        let mut engine: RulesEngine<dyn Rule> = RulesEngine::new();
        engine.add_rules([
            TestRule::boxed("first", 3, Behavior::Publish("x", json!(1))),
            TestRule::boxed("stopper", 2, Behavior::Fail("bloqueado", true)),
            TestRule::boxed("never", 1, Behavior::Publish("y", json!(1))),
        ]);

        let result = engine.execute(RuleContext::new());
        assert_eq!(ids(&result), vec!["first", "stopper"]);
        assert!(!result.changes.contains("y"));

        // The engine stays usable for the next pass.
        let again = engine.execute(RuleContext::new());
        assert_eq!(ids(&again), vec!["first", "stopper"]);
    }

    #[test]
    fn fault_is_recorded_once_and_pass_continues() {
        let mut engine: RulesEngine<dyn Rule> = RulesEngine::new();
        engine.add_rules([
            TestRule::boxed("broken", 2, Behavior::Fault),
            TestRule::boxed("after", 1, Behavior::Publish("x", json!(1))),
        ]);

        let result = engine.execute(RuleContext::new());
        assert_eq!(
            result.errors,
            vec!["Erro ao executar regra Regra broken: tabela indisponível".to_owned()]
        );
        assert!(result.changes.contains("x"));
        assert!(!result.results["broken"].success);
    }

    #[test]
    fn panic_is_contained() {
        let mut engine: RulesEngine<dyn Rule> = RulesEngine::new();
        engine.add_rules([
            TestRule::boxed("panics", 2, Behavior::Panic),
            TestRule::boxed("after", 1, Behavior::Publish("x", json!(1))),
        ]);

        let result = engine.execute(RuleContext::new());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Regra panics"));
        assert!(result.errors[0].contains("divisão por zero"));
        assert!(result.changes.contains("x"));
    }

    #[test]
    fn remove_rule_drops_all_matching_ids() {
        let mut engine: RulesEngine<dyn Rule> = RulesEngine::new();
        engine.add_rules([
            TestRule::boxed("dup", 1, Behavior::Publish("a", json!(1))),
            TestRule::boxed("dup", 2, Behavior::Publish("b", json!(1))),
            TestRule::boxed("keep", 3, Behavior::Publish("c", json!(1))),
        ]);
        assert_eq!(engine.rule_count(), 3);

        assert!(engine.remove_rule("dup"));
        assert!(!engine.remove_rule("dup"));
        assert_eq!(engine.rule_count(), 1);
        assert!(engine.rule("keep").is_some());
    }

    #[test]
    fn empty_engine_succeeds() {
        let engine: RulesEngine<dyn Rule> = RulesEngine::new();
        let result = engine.execute(RuleContext::new().with_form_value("q", json!(1)));
        assert!(result.success);
        assert!(result.results.is_empty());
        assert_eq!(result.context.form_value("q"), Some(&json!(1)));
    }
}
