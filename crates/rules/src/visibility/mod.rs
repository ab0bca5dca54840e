//! Visibility engine: rules that reshape the form's field set.
//!
//! Unlike pricing and validation, visibility rules do not publish through
//! [`RuleResult::changes`](crate::result::RuleResult). Each applicable rule
//! returns replacement field configs, and the engine merges them in stored
//! order, so a later (lower-priority) rule overrides an earlier one that
//! touched the same field.

mod rules;

pub use rules::{ConditionalVisibilityRule, ProductTypeVisibilityRule, TriggerCondition};

use std::collections::HashMap;

use quoteform_field::config::FormFieldConfig;
use tracing::{debug, trace};

use crate::context::RuleContext;
use crate::engine::RulesEngine;
use crate::result::EngineExecutionResult;
use crate::rule::VisibilityRule;

/// Rules engine specialized for visibility rules.
#[derive(Debug, Default)]
pub struct VisibilityEngine {
    engine: RulesEngine<dyn VisibilityRule>,
}

impl VisibilityEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, rule: impl VisibilityRule + 'static) {
        self.engine.add_rule(Box::new(rule));
    }

    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Box<dyn VisibilityRule>>) {
        self.engine.add_rules(rules);
    }

    pub fn remove_rule(&mut self, id: &str) -> bool {
        self.engine.remove_rule(id)
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.engine.rule_count()
    }

    pub fn rules(&self) -> impl Iterator<Item = &(dyn VisibilityRule + 'static)> {
        self.engine.rules()
    }

    pub fn execute(&self, context: RuleContext) -> EngineExecutionResult {
        self.engine.execute(context)
    }

    /// Apply every applicable rule to `fields`.
    ///
    /// The output keeps the order of `fields`; each field is replaced by its
    /// merged override when one exists.
    pub fn apply_visibility_rules(
        &self,
        fields: &[FormFieldConfig],
        context: &RuleContext,
    ) -> Vec<FormFieldConfig> {
        let mut overrides: HashMap<String, FormFieldConfig> = HashMap::new();

        for rule in self.engine.rules() {
            if !rule.is_applicable(context) {
                trace!(rule = rule.id(), "visibility rule not applicable");
                continue;
            }
            let changes = rule.apply_visibility_changes(fields, context);
            debug!(rule = rule.id(), fields = changes.len(), "visibility rule applied");
            overrides.extend(changes);
        }

        fields
            .iter()
            .map(|field| {
                overrides
                    .get(&field.key)
                    .cloned()
                    .unwrap_or_else(|| field.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use quoteform_field::kind::FieldKind;
    use serde_json::json;

    fn fields() -> Vec<FormFieldConfig> {
        vec![
            FormFieldConfig::new(keys::QUANTITY, "Quantidade", FieldKind::Number).with_order(1),
            FormFieldConfig::new(keys::VOLTAGE, "Tensão", FieldKind::Select).with_order(2),
            FormFieldConfig::new(keys::CERTIFICATION, "Certificação", FieldKind::Text)
                .with_order(3)
                .with_visible(false),
            FormFieldConfig::new("notes", "Observações", FieldKind::Textarea).with_order(4),
        ]
    }

    fn visible_keys(fields: &[FormFieldConfig]) -> Vec<&str> {
        fields
            .iter()
            .filter(|f| f.visible)
            .map(|f| f.key.as_str())
            .collect()
    }

    #[test]
    fn empty_engine_returns_fields_unchanged() {
        let engine = VisibilityEngine::new();
        let out = engine.apply_visibility_rules(&fields(), &RuleContext::new());
        assert_eq!(out, fields());
    }

    #[test]
    fn conditional_rule_reveals_and_requires_target() {
        let mut engine = VisibilityEngine::new();
        engine.add_rule(
            ConditionalVisibilityRule::new(
                "show_certification",
                keys::VOLTAGE,
                json!(">220"),
                [keys::CERTIFICATION],
            )
            .show()
            .require(),
        );

        let ctx = RuleContext::new().with_form_value(keys::VOLTAGE, json!(380));
        let out = engine.apply_visibility_rules(&fields(), &ctx);

        let cert = &out[2];
        assert_eq!(cert.key, keys::CERTIFICATION);
        assert!(cert.visible);
        assert!(cert.required);

        let quiet = RuleContext::new().with_form_value(keys::VOLTAGE, json!(110));
        assert_eq!(engine.apply_visibility_rules(&fields(), &quiet), fields());
    }

    #[test]
    fn output_keeps_original_order() {
        let mut engine = VisibilityEngine::new();
        engine.add_rule(ProductTypeVisibilityRule::new(
            "by_type",
            [("industrial", vec![keys::CERTIFICATION, keys::VOLTAGE])],
        ));

        let ctx = RuleContext::new().with_metadata(keys::PRODUCT_TYPE, json!("industrial"));
        let out = engine.apply_visibility_rules(&fields(), &ctx);
        let keys: Vec<&str> = out.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["quantity", "voltage", "certification", "notes"]);
        assert_eq!(visible_keys(&out), vec!["quantity", "voltage", "certification"]);
    }

    #[test]
    fn lower_priority_rule_wins_on_collision() {
        let mut engine = VisibilityEngine::new();
        engine.add_rule(
            ConditionalVisibilityRule::new("hide_notes", keys::QUANTITY, json!(">0"), ["notes"])
                .hide()
                .with_priority(10),
        );
        engine.add_rule(
            ConditionalVisibilityRule::new("show_notes", keys::QUANTITY, json!(">0"), ["notes"])
                .show()
                .with_priority(1),
        );

        let ctx = RuleContext::new().with_form_value(keys::QUANTITY, json!(5));
        let out = engine.apply_visibility_rules(&fields(), &ctx);
        assert!(out[3].visible);
    }

    #[test]
    fn type_allow_list_below_a_condition_still_wins() {
        let mut engine = VisibilityEngine::new();
        engine.add_rule(
            ConditionalVisibilityRule::new("hide_notes", keys::QUANTITY, json!(">0"), ["notes"])
                .hide()
                .with_priority(100),
        );
        engine.add_rule(
            ProductTypeVisibilityRule::new("by_type", [("industrial", vec![keys::VOLTAGE, "notes"])])
                .with_priority(10),
        );

        let ctx = RuleContext::new()
            .with_metadata(keys::PRODUCT_TYPE, json!("industrial"))
            .with_form_value(keys::QUANTITY, json!(5));
        let out = engine.apply_visibility_rules(&fields(), &ctx);
        assert_eq!(visible_keys(&out), vec!["quantity", "voltage", "notes"]);
    }
}
