use crate::context::RuleContext;
use crate::error::RuleError;
use crate::keys;
use crate::result::RuleResult;
use crate::rule::{Rule, RuleCategory, RuleInfo, ValidationRule};

/// Requires a certification when the requested voltage exceeds a threshold.
#[derive(Debug, Clone)]
pub struct CertificationRequiredRule {
    info: RuleInfo,
    pub voltage_threshold: f64,
}

impl CertificationRequiredRule {
    #[must_use]
    pub fn new(voltage_threshold: f64) -> Self {
        Self {
            info: RuleInfo::new("certification_required", "Certificação obrigatória")
                .with_description(format!(
                    "Exige certificação para tensões acima de {voltage_threshold}V"
                ))
                .with_priority(100),
            voltage_threshold,
        }
    }
}

crate::rule_builders!(CertificationRequiredRule);

impl Rule for CertificationRequiredRule {
    fn info(&self) -> &RuleInfo {
        &self.info
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Validation
    }

    fn is_applicable(&self, context: &RuleContext) -> bool {
        self.info.is_active_for(context)
            && context
                .form_data()
                .get_f64(keys::VOLTAGE)
                .is_some_and(|v| v > self.voltage_threshold)
    }

    fn execute(&self, context: &RuleContext) -> Result<RuleResult, RuleError> {
        if context.form_data().is_filled(keys::CERTIFICATION) {
            return Ok(RuleResult::ok());
        }
        Ok(RuleResult::failure(
            vec![format!(
                "Certificação é obrigatória para tensões acima de {}V",
                self.voltage_threshold
            )],
            false,
        ))
    }
}

impl ValidationRule for CertificationRequiredRule {}

/// Rejects orders below a minimum quantity.
#[derive(Debug, Clone)]
pub struct MinimumQuantityRule {
    info: RuleInfo,
    pub minimum_quantity: f64,
}

impl MinimumQuantityRule {
    #[must_use]
    pub fn new(minimum_quantity: f64) -> Self {
        Self {
            info: RuleInfo::new("minimum_quantity", "Quantidade mínima")
                .with_description(format!("Pedido mínimo de {minimum_quantity} unidades"))
                .with_priority(90),
            minimum_quantity,
        }
    }
}

crate::rule_builders!(MinimumQuantityRule);

impl Rule for MinimumQuantityRule {
    fn info(&self) -> &RuleInfo {
        &self.info
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Validation
    }

    fn is_applicable(&self, context: &RuleContext) -> bool {
        self.info.is_active_for(context) && context.form_data().is_filled(keys::QUANTITY)
    }

    fn execute(&self, context: &RuleContext) -> Result<RuleResult, RuleError> {
        let quantity = context
            .form_data()
            .get_f64(keys::QUANTITY)
            .ok_or_else(|| RuleError::InvalidValue {
                key: keys::QUANTITY.to_owned(),
                reason: "não é um número".to_owned(),
            })?;

        if quantity < self.minimum_quantity {
            return Ok(RuleResult::failure(
                vec![format!("Quantidade mínima é {}", self.minimum_quantity)],
                false,
            ));
        }
        Ok(RuleResult::ok())
    }
}

impl ValidationRule for MinimumQuantityRule {}

/// Keeps the requested delivery time inside a window of days.
#[derive(Debug, Clone)]
pub struct DeliveryTimeRule {
    info: RuleInfo,
    pub min_days: f64,
    pub max_days: f64,
}

impl DeliveryTimeRule {
    #[must_use]
    pub fn new(min_days: f64, max_days: f64) -> Self {
        Self {
            info: RuleInfo::new("delivery_time", "Prazo de entrega")
                .with_description(format!("Entrega entre {min_days} e {max_days} dias"))
                .with_priority(80),
            min_days,
            max_days,
        }
    }
}

crate::rule_builders!(DeliveryTimeRule);

impl Rule for DeliveryTimeRule {
    fn info(&self) -> &RuleInfo {
        &self.info
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Validation
    }

    fn is_applicable(&self, context: &RuleContext) -> bool {
        self.info.is_active_for(context) && context.form_data().is_filled(keys::DELIVERY_DAYS)
    }

    fn execute(&self, context: &RuleContext) -> Result<RuleResult, RuleError> {
        let days = context
            .form_data()
            .get_f64(keys::DELIVERY_DAYS)
            .ok_or_else(|| RuleError::InvalidValue {
                key: keys::DELIVERY_DAYS.to_owned(),
                reason: "não é um número".to_owned(),
            })?;

        if days < self.min_days || days > self.max_days {
            return Ok(RuleResult::failure(
                vec![format!(
                    "Prazo de entrega deve estar entre {} e {} dias",
                    self.min_days, self.max_days
                )],
                false,
            ));
        }
        Ok(RuleResult::ok())
    }
}

impl ValidationRule for DeliveryTimeRule {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn industrial() -> RuleContext {
        RuleContext::new().with_metadata(keys::PRODUCT_TYPE, json!("industrial"))
    }

    #[test]
    fn certification_only_above_threshold() {
        let rule = CertificationRequiredRule::new(220.0).for_product_types(["industrial"]);

        let low = industrial().with_form_value(keys::VOLTAGE, json!(220));
        let high = industrial().with_form_value(keys::VOLTAGE, json!("380"));
        let residential = RuleContext::new()
            .with_metadata(keys::PRODUCT_TYPE, json!("residential"))
            .with_form_value(keys::VOLTAGE, json!(380));

        assert!(!rule.is_applicable(&low));
        assert!(rule.is_applicable(&high));
        assert!(!rule.is_applicable(&residential));
    }

    #[test]
    fn certification_missing_fails() {
        let rule = CertificationRequiredRule::new(220.0);
        let missing = industrial().with_form_value(keys::VOLTAGE, json!(380));
        let blank = missing.clone().with_form_value(keys::CERTIFICATION, json!(""));
        let present = missing.clone().with_form_value(keys::CERTIFICATION, json!("INMETRO"));

        let result = rule.execute(&missing).unwrap();
        assert!(!result.success);
        assert_eq!(
            result.errors,
            vec!["Certificação é obrigatória para tensões acima de 220V".to_owned()]
        );
        assert!(!rule.execute(&blank).unwrap().success);
        assert!(rule.execute(&present).unwrap().success);
    }

    #[test]
    fn minimum_quantity_boundary() {
        let rule = MinimumQuantityRule::new(10.0);
        let at = RuleContext::new().with_form_value(keys::QUANTITY, json!(10));
        let below = RuleContext::new().with_form_value(keys::QUANTITY, json!("9"));

        assert!(rule.execute(&at).unwrap().success);
        assert!(!rule.execute(&below).unwrap().success);
    }

    #[test]
    fn non_numeric_quantity_is_a_fault() {
        let rule = MinimumQuantityRule::new(10.0);
        let ctx = RuleContext::new().with_form_value(keys::QUANTITY, json!("muitos"));
        assert!(rule.is_applicable(&ctx));
        assert_eq!(rule.execute(&ctx).unwrap_err().code(), "RULE_INVALID_VALUE");
    }

    #[test]
    fn delivery_window_is_inclusive() {
        let rule = DeliveryTimeRule::new(2.0, 60.0);
        for (days, ok) in [(1, false), (2, true), (30, true), (60, true), (61, false)] {
            let ctx = RuleContext::new().with_form_value(keys::DELIVERY_DAYS, json!(days));
            assert_eq!(rule.execute(&ctx).unwrap().success, ok, "days = {days}");
        }
    }
}
