use quoteform_field::prelude::*;
use quoteform_rules::keys;
use serde_json::json;

use super::{lookup, select};

pub const PROTECTION_GRADE: &str = "protection_grade";

const VOLTAGE_FACTORS: &[(&str, f64)] = &[("110", 1.0), ("220", 1.1), ("380", 1.25), ("440", 1.4)];
const PROTECTION_FACTORS: &[(&str, f64)] = &[("IP54", 1.0), ("IP65", 1.15), ("IP67", 1.3)];

pub(super) fn fields() -> Vec<FormFieldConfig> {
    vec![
        select(
            keys::VOLTAGE,
            "Tensão",
            10,
            &[
                ("110V", json!(110)),
                ("220V", json!(220)),
                ("380V", json!(380)),
                ("440V", json!(440)),
            ],
        )
        .with_required(true),
        select(
            PROTECTION_GRADE,
            "Grau de proteção",
            11,
            &[("IP54", json!("IP54")), ("IP65", json!("IP65")), ("IP67", json!("IP67"))],
        )
        .with_required(true),
        FormFieldConfig::new(keys::CERTIFICATION, "Certificação", FieldKind::Text)
            .with_order(12)
            .with_visible(false)
            .with_hint("Número do certificado NR-10 ou equivalente")
            .with_constraint(FieldConstraint::min_length(3)),
    ]
}

pub(super) fn multiplier(form_data: &ValueMap) -> f64 {
    lookup(VOLTAGE_FACTORS, form_data.get(keys::VOLTAGE))
        * lookup(PROTECTION_FACTORS, form_data.get(PROTECTION_GRADE))
}

pub(super) fn validate(form_data: &ValueMap) -> Vec<String> {
    let mut errors = Vec::new();
    let voltage = form_data.get_f64(keys::VOLTAGE);
    let grade = form_data.get_string(PROTECTION_GRADE);

    if voltage.is_some_and(|v| v >= 380.0) && grade == Some("IP54") {
        errors.push("Tensões a partir de 380V exigem grau de proteção IP65 ou superior".to_owned());
    }
    errors
}
