//! Pricing engine and price adjustment model.
//!
//! Pricing rules publish adjustments as pairs of calculated values,
//! `<kind>_amount` (signed delta) and `<kind>_percentage` (informational).
//! Every amount is computed against the seeded base price, so adjustments
//! add up instead of compounding.

mod rules;

pub use rules::{UrgencyFeeRule, VipDiscountRule, VolumeDiscountRule};

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::context::RuleContext;
use crate::engine::RulesEngine;
use crate::keys;
use crate::result::EngineExecutionResult;
use crate::rule::PricingRule;

/// The adjustment shapes the pricing engine recognizes in rule changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    VolumeDiscount,
    UrgencyFee,
    VipDiscount,
}

impl AdjustmentKind {
    /// Scan order within a single rule's changes.
    pub const ALL: [Self; 3] = [Self::VolumeDiscount, Self::UrgencyFee, Self::VipDiscount];

    #[must_use]
    pub fn amount_key(&self) -> &'static str {
        match self {
            Self::VolumeDiscount => "volume_discount_amount",
            Self::UrgencyFee => "urgency_fee_amount",
            Self::VipDiscount => "vip_discount_amount",
        }
    }

    #[must_use]
    pub fn percentage_key(&self) -> &'static str {
        match self {
            Self::VolumeDiscount => "volume_discount_percentage",
            Self::UrgencyFee => "urgency_fee_percentage",
            Self::VipDiscount => "vip_discount_percentage",
        }
    }

    /// Label shown to the customer.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::VolumeDiscount => "Desconto por volume",
            Self::UrgencyFee => "Taxa de urgência",
            Self::VipDiscount => "Desconto VIP",
        }
    }
}

/// A signed price delta: negative for discounts, positive for fees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAdjustment {
    pub kind: AdjustmentKind,
    pub label: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl PriceAdjustment {
    #[must_use]
    pub fn new(kind: AdjustmentKind, amount: f64, percentage: Option<f64>) -> Self {
        Self {
            kind,
            label: kind.label().to_owned(),
            amount,
            percentage,
        }
    }

    #[must_use]
    pub fn is_discount(&self) -> bool {
        self.amount < 0.0
    }

    #[must_use]
    pub fn is_fee(&self) -> bool {
        self.amount > 0.0
    }
}

/// Final price breakdown produced by [`PricingEngine::calculate_final_price`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub base_price: f64,
    pub final_price: f64,
    /// In the order the producing rules ran.
    pub adjustments: Vec<PriceAdjustment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

impl PricingResult {
    /// A result with no adjustments.
    #[must_use]
    pub fn unadjusted(base_price: f64) -> Self {
        Self {
            base_price,
            final_price: base_price,
            adjustments: Vec::new(),
            errors: Vec::new(),
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn total_adjustment(&self) -> f64 {
        self.final_price - self.base_price
    }

    /// Sum of the absolute values of every discount.
    #[must_use]
    pub fn savings_amount(&self) -> f64 {
        self.adjustments
            .iter()
            .filter(|a| a.is_discount())
            .map(|a| a.amount.abs())
            .sum()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Rules engine specialized for pricing rules.
#[derive(Debug, Default)]
pub struct PricingEngine {
    engine: RulesEngine<dyn PricingRule>,
}

impl PricingEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, rule: impl PricingRule + 'static) {
        self.engine.add_rule(Box::new(rule));
    }

    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Box<dyn PricingRule>>) {
        self.engine.add_rules(rules);
    }

    pub fn remove_rule(&mut self, id: &str) -> bool {
        self.engine.remove_rule(id)
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.engine.rule_count()
    }

    pub fn rules(&self) -> impl Iterator<Item = &(dyn PricingRule + 'static)> {
        self.engine.rules()
    }

    /// Run a plain pass without adjustment extraction.
    pub fn execute(&self, context: RuleContext) -> EngineExecutionResult {
        self.engine.execute(context)
    }

    /// Apply every applicable pricing rule to `base_price`.
    #[tracing::instrument(level = "debug", skip(self, context))]
    pub fn calculate_final_price(&self, base_price: f64, mut context: RuleContext) -> PricingResult {
        context.set_calculated(keys::BASE_PRICE, json!(base_price));
        let execution = self.engine.execute(context);

        let mut result = PricingResult::unadjusted(base_price);
        for (rule_id, rule_result) in execution.successful() {
            for kind in AdjustmentKind::ALL {
                let Some(amount) = rule_result.changes.get_f64(kind.amount_key()) else {
                    continue;
                };
                let percentage = rule_result.changes.get_f64(kind.percentage_key());
                debug!(rule = rule_id, ?kind, amount, "price adjustment");
                result.final_price += amount;
                result
                    .adjustments
                    .push(PriceAdjustment::new(kind, amount, percentage));
            }
        }
        result.errors = execution.errors;
        result.messages = execution.messages;
        result
    }
}
