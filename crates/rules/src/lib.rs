//! Rules engine for quoteform.
//!
//! A [`Rule`](rule::Rule) is a named, prioritized, conditionally applicable
//! unit of business logic. A [`RulesEngine`](engine::RulesEngine) runs the
//! applicable rules of one category in descending priority against a
//! [`RuleContext`](context::RuleContext), threading each rule's changes into
//! the context seen by the rules after it.
//!
//! Three specialized engines sit on top:
//!
//! - [`PricingEngine`](pricing::PricingEngine) turns rule changes into price
//!   adjustments.
//! - [`ValidationEngine`](validation::ValidationEngine) reports whether the
//!   form state is acceptable.
//! - [`VisibilityEngine`](visibility::VisibilityEngine) shows, hides and
//!   requires form fields.
//!
//! ```
//! use quoteform_rules::prelude::*;
//! use serde_json::json;
//!
//! let mut pricing = PricingEngine::new();
//! pricing.add_rule(VolumeDiscountRule::new(50.0, 15.0));
//!
//! let context = RuleContext::new().with_form_value(keys::QUANTITY, json!(100));
//! let result = pricing.calculate_final_price(1000.0, context);
//! assert_eq!(result.final_price, 850.0);
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod keys;
pub mod pricing;
pub mod result;
pub mod rule;
pub mod validation;
pub mod visibility;

pub mod prelude {
    pub use crate::context::RuleContext;
    pub use crate::engine::RulesEngine;
    pub use crate::error::RuleError;
    pub use crate::keys;
    pub use crate::pricing::{
        AdjustmentKind, PriceAdjustment, PricingEngine, PricingResult, UrgencyFeeRule,
        VipDiscountRule, VolumeDiscountRule,
    };
    pub use crate::result::{EngineExecutionResult, RuleResult};
    pub use crate::rule::{
        PricingRule, Rule, RuleCategory, RuleInfo, ValidationRule, VisibilityRule,
    };
    pub use crate::validation::{
        CertificationRequiredRule, DeliveryTimeRule, MinimumQuantityRule, ValidationEngine,
        ValidationResult,
    };
    pub use crate::visibility::{
        ConditionalVisibilityRule, ProductTypeVisibilityRule, TriggerCondition, VisibilityEngine,
    };
}
