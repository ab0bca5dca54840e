use quoteform_field::prelude::*;
use serde_json::json;

use super::{lookup, select};

pub const CONTRACT_TIER: &str = "contract_tier";
pub const SUPPORT_LEVEL: &str = "support_level";
pub const SLA_HOURS: &str = "sla_hours";
pub const COMPLIANCE: &str = "compliance";

const TIER_FACTORS: &[(&str, f64)] = &[("basic", 1.0), ("professional", 1.3), ("enterprise", 1.6)];
const SUPPORT_FACTORS: &[(&str, f64)] = &[("standard", 1.0), ("priority", 1.2), ("dedicated", 1.5)];
const COMPLIANCE_STEP: f64 = 0.05;

pub(super) fn fields() -> Vec<FormFieldConfig> {
    vec![
        select(
            CONTRACT_TIER,
            "Plano de contrato",
            10,
            &[
                ("Básico", json!("basic")),
                ("Profissional", json!("professional")),
                ("Enterprise", json!("enterprise")),
            ],
        )
        .with_required(true),
        select(
            SUPPORT_LEVEL,
            "Nível de suporte",
            11,
            &[
                ("Padrão", json!("standard")),
                ("Prioritário", json!("priority")),
                ("Dedicado", json!("dedicated")),
            ],
        ),
        FormFieldConfig::new(SLA_HOURS, "SLA (horas)", FieldKind::Number)
            .with_order(12)
            .with_constraints(FieldConstraint::range(1.0, 168.0)),
        FormFieldConfig::new(COMPLIANCE, "Conformidade", FieldKind::MultiSelect)
            .with_order(13)
            .with_options([
                SelectOption::new("LGPD", json!("lgpd")),
                SelectOption::new("ISO 27001", json!("iso27001")),
                SelectOption::new("SOC 2", json!("soc2")),
            ]),
    ]
}

fn sla_factor(hours: Option<f64>) -> f64 {
    match hours {
        Some(h) if h <= 4.0 => 1.3,
        Some(h) if h <= 8.0 => 1.15,
        Some(h) if h <= 24.0 => 1.05,
        _ => 1.0,
    }
}

pub(super) fn multiplier(form_data: &ValueMap) -> f64 {
    let compliance = form_data
        .get(COMPLIANCE)
        .and_then(|v| v.as_array())
        .map_or(0, Vec::len);
    let compliance_factor = COMPLIANCE_STEP.mul_add(compliance as f64, 1.0);

    lookup(TIER_FACTORS, form_data.get(CONTRACT_TIER))
        * lookup(SUPPORT_FACTORS, form_data.get(SUPPORT_LEVEL))
        * sla_factor(form_data.get_f64(SLA_HOURS))
        * compliance_factor
}

pub(super) fn validate(form_data: &ValueMap) -> Vec<String> {
    let mut errors = Vec::new();
    let tier = form_data.get_string(CONTRACT_TIER);
    let support = form_data.get_string(SUPPORT_LEVEL);

    if support == Some("dedicated") && tier != Some("enterprise") {
        errors.push("Suporte dedicado disponível apenas no plano Enterprise".to_owned());
    }
    let fast_support = matches!(support, Some("priority" | "dedicated"));
    if form_data.get_f64(SLA_HOURS).is_some_and(|h| h < 8.0) && !fast_support {
        errors.push("SLA inferior a 8 horas exige suporte prioritário ou dedicado".to_owned());
    }
    errors
}
