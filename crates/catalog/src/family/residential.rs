use quoteform_field::prelude::*;
use serde_json::json;

use super::{lookup, select};

pub const COLOR: &str = "color";
pub const WARRANTY_YEARS: &str = "warranty_years";
pub const ENERGY_EFFICIENCY: &str = "energy_efficiency";
pub const INSTALLATION: &str = "installation";

const COLOR_FACTORS: &[(&str, f64)] = &[("branco", 1.0), ("preto", 1.05), ("inox", 1.15)];
const WARRANTY_FACTORS: &[(&str, f64)] = &[("1", 1.0), ("2", 1.08), ("3", 1.15), ("5", 1.25)];
const EFFICIENCY_FACTORS: &[(&str, f64)] = &[("A", 1.2), ("B", 1.1), ("C", 1.0)];
const INSTALLATION_FACTOR: f64 = 1.1;

pub(super) fn fields() -> Vec<FormFieldConfig> {
    vec![
        select(
            COLOR,
            "Cor",
            10,
            &[("Branco", json!("branco")), ("Preto", json!("preto")), ("Inox", json!("inox"))],
        )
        .with_required(true),
        select(
            WARRANTY_YEARS,
            "Garantia (anos)",
            11,
            &[("1 ano", json!(1)), ("2 anos", json!(2)), ("3 anos", json!(3)), ("5 anos", json!(5))],
        ),
        select(
            ENERGY_EFFICIENCY,
            "Eficiência energética",
            12,
            &[("A", json!("A")), ("B", json!("B")), ("C", json!("C"))],
        ),
        FormFieldConfig::new(INSTALLATION, "Instalação profissional", FieldKind::Checkbox)
            .with_order(13),
    ]
}

pub(super) fn multiplier(form_data: &ValueMap) -> f64 {
    let installation = if form_data.get_bool(INSTALLATION) == Some(true) {
        INSTALLATION_FACTOR
    } else {
        1.0
    };
    lookup(COLOR_FACTORS, form_data.get(COLOR))
        * lookup(WARRANTY_FACTORS, form_data.get(WARRANTY_YEARS))
        * lookup(EFFICIENCY_FACTORS, form_data.get(ENERGY_EFFICIENCY))
        * installation
}

pub(super) fn validate(form_data: &ValueMap) -> Vec<String> {
    let mut errors = Vec::new();
    let installation = form_data.get_bool(INSTALLATION) == Some(true);
    let warranty = form_data.get_f64(WARRANTY_YEARS);

    if installation && warranty.is_some_and(|w| w < 2.0) {
        errors.push("Instalação profissional exige garantia mínima de 2 anos".to_owned());
    }
    let inox = form_data.get_string(COLOR) == Some("inox");
    if inox && form_data.get_string(ENERGY_EFFICIENCY) == Some("C") {
        errors.push("Acabamento inox disponível apenas nas classes A e B".to_owned());
    }
    errors
}
