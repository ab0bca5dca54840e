use std::collections::BTreeSet;

use quoteform_field::values::ValueMap;
use serde_json::json;

use super::AdjustmentKind;
use crate::context::RuleContext;
use crate::error::RuleError;
use crate::keys;
use crate::result::RuleResult;
use crate::rule::{PricingRule, Rule, RuleCategory, RuleInfo};

fn base_price(context: &RuleContext) -> Result<f64, RuleError> {
    context.base_price().ok_or_else(|| RuleError::MissingValue {
        key: keys::BASE_PRICE.to_owned(),
    })
}

fn adjustment(kind: AdjustmentKind, amount: f64, percentage: f64) -> ValueMap {
    ValueMap::new()
        .with(kind.amount_key(), json!(amount))
        .with(kind.percentage_key(), json!(percentage))
}

/// Discount for orders of at least `minimum_quantity` units.
#[derive(Debug, Clone)]
pub struct VolumeDiscountRule {
    info: RuleInfo,
    pub minimum_quantity: f64,
    pub discount_percentage: f64,
}

impl VolumeDiscountRule {
    #[must_use]
    pub fn new(minimum_quantity: f64, discount_percentage: f64) -> Self {
        Self {
            info: RuleInfo::new("volume_discount", "Desconto por volume")
                .with_description(format!(
                    "{discount_percentage}% de desconto a partir de {minimum_quantity} unidades"
                ))
                .with_priority(100),
            minimum_quantity,
            discount_percentage,
        }
    }
}

crate::rule_builders!(VolumeDiscountRule);

impl Rule for VolumeDiscountRule {
    fn info(&self) -> &RuleInfo {
        &self.info
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Pricing
    }

    fn is_applicable(&self, context: &RuleContext) -> bool {
        self.info.is_active_for(context)
            && context
                .form_data()
                .get_f64(keys::QUANTITY)
                .is_some_and(|q| q >= self.minimum_quantity)
    }

    fn execute(&self, context: &RuleContext) -> Result<RuleResult, RuleError> {
        let base = base_price(context)?;
        let amount = -(base * self.discount_percentage / 100.0);
        Ok(RuleResult::success(
            Some(format!(
                "Desconto por volume de {}% aplicado",
                self.discount_percentage
            )),
            adjustment(AdjustmentKind::VolumeDiscount, amount, self.discount_percentage),
        ))
    }
}

impl PricingRule for VolumeDiscountRule {}

/// Fee for deliveries requested within `max_delivery_days`.
#[derive(Debug, Clone)]
pub struct UrgencyFeeRule {
    info: RuleInfo,
    pub max_delivery_days: f64,
    pub fee_percentage: f64,
}

impl UrgencyFeeRule {
    #[must_use]
    pub fn new(max_delivery_days: f64, fee_percentage: f64) -> Self {
        Self {
            info: RuleInfo::new("urgency_fee", "Taxa de urgência")
                .with_description(format!(
                    "{fee_percentage}% de taxa para entrega em até {max_delivery_days} dias"
                ))
                .with_priority(90),
            max_delivery_days,
            fee_percentage,
        }
    }
}

crate::rule_builders!(UrgencyFeeRule);

impl Rule for UrgencyFeeRule {
    fn info(&self) -> &RuleInfo {
        &self.info
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Pricing
    }

    fn is_applicable(&self, context: &RuleContext) -> bool {
        self.info.is_active_for(context)
            && context
                .form_data()
                .get_f64(keys::DELIVERY_DAYS)
                .is_some_and(|d| d <= self.max_delivery_days)
    }

    fn execute(&self, context: &RuleContext) -> Result<RuleResult, RuleError> {
        let base = base_price(context)?;
        let amount = base * self.fee_percentage / 100.0;
        Ok(RuleResult::success(
            Some(format!("Taxa de urgência de {}% aplicada", self.fee_percentage)),
            adjustment(AdjustmentKind::UrgencyFee, amount, self.fee_percentage),
        ))
    }
}

impl PricingRule for UrgencyFeeRule {}

/// Discount for customers on the VIP list.
#[derive(Debug, Clone)]
pub struct VipDiscountRule {
    info: RuleInfo,
    pub discount_percentage: f64,
    pub vip_customers: BTreeSet<String>,
}

impl VipDiscountRule {
    #[must_use]
    pub fn new<I, S>(discount_percentage: f64, vip_customers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            info: RuleInfo::new("vip_discount", "Desconto VIP")
                .with_description(format!("{discount_percentage}% de desconto para clientes VIP"))
                .with_priority(80),
            discount_percentage,
            vip_customers: vip_customers.into_iter().map(Into::into).collect(),
        }
    }
}

crate::rule_builders!(VipDiscountRule);

impl Rule for VipDiscountRule {
    fn info(&self) -> &RuleInfo {
        &self.info
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Pricing
    }

    fn is_applicable(&self, context: &RuleContext) -> bool {
        self.info.is_active_for(context)
            && context
                .customer_id()
                .is_some_and(|c| self.vip_customers.contains(c))
    }

    fn execute(&self, context: &RuleContext) -> Result<RuleResult, RuleError> {
        let base = base_price(context)?;
        let amount = -(base * self.discount_percentage / 100.0);
        Ok(RuleResult::success(
            Some(format!("Desconto VIP de {}% aplicado", self.discount_percentage)),
            adjustment(AdjustmentKind::VipDiscount, amount, self.discount_percentage),
        ))
    }
}

impl PricingRule for VipDiscountRule {}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(base: f64) -> RuleContext {
        RuleContext::new().with_calculated(keys::BASE_PRICE, json!(base))
    }

    #[test]
    fn volume_discount_threshold_is_inclusive() {
        let rule = VolumeDiscountRule::new(50.0, 15.0);
        let at = priced(1000.0).with_form_value(keys::QUANTITY, json!(50));
        let below = priced(1000.0).with_form_value(keys::QUANTITY, json!(49));
        let missing = priced(1000.0);

        assert!(rule.is_applicable(&at));
        assert!(!rule.is_applicable(&below));
        assert!(!rule.is_applicable(&missing));
    }

    #[test]
    fn volume_discount_amount() {
        let rule = VolumeDiscountRule::new(50.0, 15.0);
        let ctx = priced(1000.0).with_form_value(keys::QUANTITY, json!(100));

        let result = rule.execute(&ctx).unwrap();
        assert!(result.success);
        assert_eq!(result.changes.get_f64("volume_discount_amount"), Some(-150.0));
        assert_eq!(result.changes.get_f64("volume_discount_percentage"), Some(15.0));
        assert_eq!(
            result.message.as_deref(),
            Some("Desconto por volume de 15% aplicado")
        );
    }

    #[test]
    fn urgency_fee_applicability_and_amount() {
        let rule = UrgencyFeeRule::new(7.0, 20.0);
        let urgent = priced(1000.0).with_form_value(keys::DELIVERY_DAYS, json!(5));
        let relaxed = priced(1000.0).with_form_value(keys::DELIVERY_DAYS, json!(10));

        assert!(rule.is_applicable(&urgent));
        assert!(!rule.is_applicable(&relaxed));
        let result = rule.execute(&urgent).unwrap();
        assert_eq!(result.changes.get_f64("urgency_fee_amount"), Some(200.0));
    }

    #[test]
    fn vip_discount_matches_customer() {
        let rule = VipDiscountRule::new(10.0, ["acme", "globex"]);
        let vip = priced(800.0).with_metadata(keys::CUSTOMER_ID, json!("acme"));
        let regular = priced(800.0).with_metadata(keys::CUSTOMER_ID, json!("initech"));
        let anonymous = priced(800.0);

        assert!(rule.is_applicable(&vip));
        assert!(!rule.is_applicable(&regular));
        assert!(!rule.is_applicable(&anonymous));
        let result = rule.execute(&vip).unwrap();
        assert_eq!(result.changes.get_f64("vip_discount_amount"), Some(-80.0));
    }

    #[test]
    fn missing_base_price_is_a_fault() {
        let rule = VolumeDiscountRule::new(1.0, 5.0);
        let err = rule.execute(&RuleContext::new()).unwrap_err();
        assert_eq!(
            err,
            RuleError::MissingValue {
                key: "base_price".into()
            }
        );
    }

    #[test]
    fn product_type_restriction() {
        let rule = VolumeDiscountRule::new(10.0, 5.0).for_product_types(["industrial"]);
        let industrial = priced(100.0)
            .with_form_value(keys::QUANTITY, json!(20))
            .with_metadata(keys::PRODUCT_TYPE, json!("industrial"));
        let residential = priced(100.0)
            .with_form_value(keys::QUANTITY, json!(20))
            .with_metadata(keys::PRODUCT_TYPE, json!("residential"));

        assert!(rule.is_applicable(&industrial));
        assert!(!rule.is_applicable(&residential));
    }

    #[test]
    fn builders_override_identity() {
        let rule = UrgencyFeeRule::new(3.0, 30.0)
            .with_id("express")
            .with_name("Expresso")
            .with_priority(7)
            .with_enabled(false);
        assert_eq!(rule.id(), "express");
        assert_eq!(rule.name(), "Expresso");
        assert_eq!(rule.priority(), 7);
        assert!(!rule.info().enabled);
    }
}
