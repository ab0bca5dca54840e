//! Per-family form fields, price multipliers and business rules.
//!
//! Every product shares the common fields (quantity, delivery days, notes);
//! the three known families add their own. Multipliers apply to the unit
//! price and compound with each other; unknown option values count as 1.0.

mod corporate;
mod industrial;
mod residential;

pub use corporate::{COMPLIANCE, CONTRACT_TIER, SLA_HOURS, SUPPORT_LEVEL};
pub use industrial::PROTECTION_GRADE;
pub use residential::{COLOR, ENERGY_EFFICIENCY, INSTALLATION, WARRANTY_YEARS};

use quoteform_field::prelude::*;
use quoteform_rules::keys;
use serde_json::Value;

use crate::product_type::ProductType;

/// Key of the free-text notes field every product carries.
pub const NOTES: &str = "notes";

/// Default form fields for a product of the given type.
#[must_use]
pub fn default_fields(product_type: &ProductType) -> Vec<FormFieldConfig> {
    let mut fields = common_fields();
    match product_type {
        ProductType::Industrial => fields.extend(industrial::fields()),
        ProductType::Residential => fields.extend(residential::fields()),
        ProductType::Corporate => fields.extend(corporate::fields()),
        ProductType::Other(_) => {}
    }
    fields
}

/// Combined unit-price multiplier for the chosen options.
#[must_use]
pub fn price_multiplier(product_type: &ProductType, form_data: &ValueMap) -> f64 {
    match product_type {
        ProductType::Industrial => industrial::multiplier(form_data),
        ProductType::Residential => residential::multiplier(form_data),
        ProductType::Corporate => corporate::multiplier(form_data),
        ProductType::Other(_) => 1.0,
    }
}

/// Cross-field business rule violations for the given type.
#[must_use]
pub fn validate(product_type: &ProductType, form_data: &ValueMap) -> Vec<String> {
    match product_type {
        ProductType::Industrial => industrial::validate(form_data),
        ProductType::Residential => residential::validate(form_data),
        ProductType::Corporate => corporate::validate(form_data),
        ProductType::Other(_) => Vec::new(),
    }
}

fn common_fields() -> Vec<FormFieldConfig> {
    vec![
        FormFieldConfig::new(keys::QUANTITY, "Quantidade", FieldKind::Number)
            .with_order(1)
            .with_required(true)
            .with_placeholder("1")
            .with_constraint(FieldConstraint::min(1.0).with_message("Quantidade deve ser no mínimo 1")),
        FormFieldConfig::new(keys::DELIVERY_DAYS, "Prazo de entrega (dias)", FieldKind::Number)
            .with_order(2)
            .with_required(true)
            .with_constraints(FieldConstraint::range(1.0, 365.0)),
        FormFieldConfig::new(NOTES, "Observações", FieldKind::Textarea)
            .with_order(100)
            .with_constraint(FieldConstraint::max_length(500)),
    ]
}

/// Look up the multiplier of the selected option. Numeric and string
/// option values are both matched by their string form.
fn lookup(table: &[(&str, f64)], value: Option<&Value>) -> f64 {
    let Some(selected) = value.and_then(option_key) else {
        return 1.0;
    };
    table
        .iter()
        .find(|(key, _)| *key == selected)
        .map_or(1.0, |(_, factor)| *factor)
}

fn option_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map_or_else(|| n.to_string(), |f| format!("{f:.0}")),
        ),
        _ => None,
    }
}

fn select(key: &str, label: &str, order: i32, options: &[(&str, Value)]) -> FormFieldConfig {
    FormFieldConfig::new(key, label, FieldKind::Select)
        .with_order(order)
        .with_options(
            options
                .iter()
                .map(|(label, value)| SelectOption::new(*label, value.clone())),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_matches_numbers_and_strings() {
        let table = [("220", 1.1), ("380", 1.25)];
        assert_eq!(lookup(&table, Some(&json!(220))), 1.1);
        assert_eq!(lookup(&table, Some(&json!("380"))), 1.25);
        assert_eq!(lookup(&table, Some(&json!(220.0))), 1.1);
        assert_eq!(lookup(&table, Some(&json!(127))), 1.0);
        assert_eq!(lookup(&table, None), 1.0);
    }

    #[test]
    fn every_family_has_the_common_fields() {
        for product_type in [
            ProductType::Industrial,
            ProductType::Residential,
            ProductType::Corporate,
            ProductType::Other("naval".into()),
        ] {
            let fields = default_fields(&product_type);
            for key in [keys::QUANTITY, keys::DELIVERY_DAYS, NOTES] {
                assert!(fields.iter().any(|f| f.key == key), "{product_type} lacks {key}");
            }
        }
    }

    #[test]
    fn other_types_have_neutral_pricing() {
        let data = ValueMap::new().with(keys::VOLTAGE, json!(440));
        let other = ProductType::Other("naval".into());
        assert_eq!(price_multiplier(&other, &data), 1.0);
        assert!(validate(&other, &data).is_empty());
    }
}
