//! Declarative rule configuration.
//!
//! Every section is optional in a document; missing sections and fields fall
//! back to the stock rule set. A section is switched off with
//! `enabled = false`.

use std::collections::BTreeMap;
use std::path::Path;

use quoteform_catalog::family;
use quoteform_rules::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::FormError;

/// Document formats a [`RulesConfig`] can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnsupportedFormat`] for anything but `json` and
    /// `toml`.
    pub fn from_path(path: &Path) -> Result<Self, FormError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(FormError::UnsupportedFormat { extension }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }
}

/// Volume discount settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeDiscountConfig {
    pub enabled: bool,
    pub minimum_quantity: f64,
    pub discount_percentage: f64,
    pub product_types: Vec<String>,
}

impl Default for VolumeDiscountConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            minimum_quantity: 50.0,
            discount_percentage: 15.0,
            product_types: Vec::new(),
        }
    }
}

/// Urgent delivery fee settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyFeeConfig {
    pub enabled: bool,
    pub max_delivery_days: f64,
    pub fee_percentage: f64,
}

impl Default for UrgencyFeeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_delivery_days: 7.0,
            fee_percentage: 20.0,
        }
    }
}

/// VIP customer discount settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VipDiscountConfig {
    pub enabled: bool,
    pub discount_percentage: f64,
    pub customers: Vec<String>,
}

impl Default for VipDiscountConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            discount_percentage: 10.0,
            customers: vec!["cliente-vip-001".to_owned(), "cliente-vip-002".to_owned()],
        }
    }
}

/// Certification requirement for high-voltage equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationConfig {
    pub enabled: bool,
    pub voltage_threshold: f64,
    pub product_types: Vec<String>,
}

impl Default for CertificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            voltage_threshold: 220.0,
            product_types: vec!["industrial".to_owned()],
        }
    }
}

/// Minimum order size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimumQuantityConfig {
    pub enabled: bool,
    pub minimum_quantity: f64,
}

impl Default for MinimumQuantityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            minimum_quantity: 1.0,
        }
    }
}

/// Accepted delivery lead times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryWindowConfig {
    pub enabled: bool,
    pub min_days: f64,
    pub max_days: f64,
}

impl Default for DeliveryWindowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_days: 2.0,
            max_days: 180.0,
        }
    }
}

/// One conditional visibility rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalVisibilityConfig {
    pub id: String,
    pub trigger_field: String,
    /// `">N"` and `"<N"` are numeric thresholds; anything else must match.
    pub trigger_value: Value,
    pub targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl ConditionalVisibilityConfig {
    fn build(&self) -> ConditionalVisibilityRule {
        let mut rule = ConditionalVisibilityRule::new(
            &self.id,
            &self.trigger_field,
            self.trigger_value.clone(),
            &self.targets,
        );
        rule.visible = self.visible;
        rule.required = self.required;
        match self.priority {
            Some(priority) => rule.with_priority(priority),
            None => rule,
        }
    }
}

/// The full rule set driving a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub volume_discount: VolumeDiscountConfig,
    pub urgency_fee: UrgencyFeeConfig,
    pub vip_discount: VipDiscountConfig,
    pub certification: CertificationConfig,
    pub minimum_quantity: MinimumQuantityConfig,
    pub delivery_window: DeliveryWindowConfig,
    pub conditional_visibility: Vec<ConditionalVisibilityConfig>,
    /// Product type → field keys shown for it. Quantity is always shown.
    pub product_type_fields: BTreeMap<String, Vec<String>>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            volume_discount: VolumeDiscountConfig::default(),
            urgency_fee: UrgencyFeeConfig::default(),
            vip_discount: VipDiscountConfig::default(),
            certification: CertificationConfig::default(),
            minimum_quantity: MinimumQuantityConfig::default(),
            delivery_window: DeliveryWindowConfig::default(),
            conditional_visibility: vec![
                ConditionalVisibilityConfig {
                    id: "certification_above_220v".to_owned(),
                    trigger_field: keys::VOLTAGE.to_owned(),
                    trigger_value: json!(">220"),
                    targets: vec![keys::CERTIFICATION.to_owned()],
                    visible: Some(true),
                    required: Some(true),
                    priority: None,
                },
                ConditionalVisibilityConfig {
                    id: "warranty_with_installation".to_owned(),
                    trigger_field: family::INSTALLATION.to_owned(),
                    trigger_value: json!(true),
                    targets: vec![family::WARRANTY_YEARS.to_owned()],
                    visible: None,
                    required: Some(true),
                    priority: None,
                },
                ConditionalVisibilityConfig {
                    id: "no_compliance_on_basic".to_owned(),
                    trigger_field: family::CONTRACT_TIER.to_owned(),
                    trigger_value: json!("basic"),
                    targets: vec![family::COMPLIANCE.to_owned()],
                    visible: Some(false),
                    required: None,
                    priority: None,
                },
            ],
            product_type_fields: BTreeMap::from([
                (
                    "industrial".to_owned(),
                    allow_list(&[keys::VOLTAGE, family::PROTECTION_GRADE]),
                ),
                (
                    "residential".to_owned(),
                    allow_list(&[
                        family::COLOR,
                        family::WARRANTY_YEARS,
                        family::ENERGY_EFFICIENCY,
                        family::INSTALLATION,
                    ]),
                ),
                (
                    "corporate".to_owned(),
                    allow_list(&[
                        family::CONTRACT_TIER,
                        family::SUPPORT_LEVEL,
                        family::SLA_HOURS,
                        family::COMPLIANCE,
                    ]),
                ),
            ]),
        }
    }
}

/// Common optional fields plus the family-specific keys.
fn allow_list(specific: &[&str]) -> Vec<String> {
    [keys::DELIVERY_DAYS, family::NOTES]
        .iter()
        .chain(specific)
        .map(|k| (*k).to_owned())
        .collect()
}

/// The three engines a form runs.
#[derive(Debug, Default)]
pub struct RuleEngines {
    pub pricing: PricingEngine,
    pub validation: ValidationEngine,
    pub visibility: VisibilityEngine,
}

impl RulesConfig {
    /// Parse a document in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::ConfigParse`] when the document is malformed.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, FormError> {
        let parsed = match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| FormError::ConfigParse {
            format: format.name(),
            message,
        })
    }

    /// Load a `.json` or `.toml` file.
    ///
    /// # Errors
    ///
    /// Fails when the extension is unknown, the file cannot be read or its
    /// content does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FormError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| FormError::ConfigIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), format = format.name(), "loading rules config");
        Self::parse(&content, format)
    }

    /// Pricing engine with the enabled pricing rules.
    #[must_use]
    pub fn pricing_engine(&self) -> PricingEngine {
        let mut engine = PricingEngine::new();
        if self.volume_discount.enabled {
            let c = &self.volume_discount;
            engine.add_rule(
                VolumeDiscountRule::new(c.minimum_quantity, c.discount_percentage)
                    .for_product_types(&c.product_types),
            );
        }
        if self.urgency_fee.enabled {
            let c = &self.urgency_fee;
            engine.add_rule(UrgencyFeeRule::new(c.max_delivery_days, c.fee_percentage));
        }
        if self.vip_discount.enabled {
            let c = &self.vip_discount;
            engine.add_rule(VipDiscountRule::new(c.discount_percentage, &c.customers));
        }
        engine
    }

    /// Validation engine with the enabled validation rules.
    #[must_use]
    pub fn validation_engine(&self) -> ValidationEngine {
        let mut engine = ValidationEngine::new();
        if self.certification.enabled {
            let c = &self.certification;
            engine.add_rule(
                CertificationRequiredRule::new(c.voltage_threshold)
                    .for_product_types(&c.product_types),
            );
        }
        if self.minimum_quantity.enabled {
            engine.add_rule(MinimumQuantityRule::new(self.minimum_quantity.minimum_quantity));
        }
        if self.delivery_window.enabled {
            let c = &self.delivery_window;
            engine.add_rule(DeliveryTimeRule::new(c.min_days, c.max_days));
        }
        engine
    }

    /// Visibility engine with the product type allow-lists and every
    /// conditional rule.
    #[must_use]
    pub fn visibility_engine(&self) -> VisibilityEngine {
        let mut engine = VisibilityEngine::new();
        if !self.product_type_fields.is_empty() {
            engine.add_rule(ProductTypeVisibilityRule::new(
                "product_type_fields",
                &self.product_type_fields,
            ));
        }
        for conditional in &self.conditional_visibility {
            engine.add_rule(conditional.build());
        }
        engine
    }

    #[must_use]
    pub fn build(&self) -> RuleEngines {
        RuleEngines {
            pricing: self.pricing_engine(),
            validation: self.validation_engine(),
            visibility: self.visibility_engine(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stock_set_builds_every_rule() {
        let engines = RulesConfig::default().build();
        assert_eq!(engines.pricing.rule_count(), 3);
        assert_eq!(engines.validation.rule_count(), 3);
        assert_eq!(engines.visibility.rule_count(), 4);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = RulesConfig::parse(
            r#"{"volume_discount": {"minimum_quantity": 10}, "vip_discount": {"enabled": false}}"#,
            ConfigFormat::Json,
        )
        .unwrap();

        assert_eq!(config.volume_discount.minimum_quantity, 10.0);
        assert_eq!(config.volume_discount.discount_percentage, 15.0);
        assert_eq!(config.urgency_fee, UrgencyFeeConfig::default());
        assert_eq!(config.pricing_engine().rule_count(), 2);
    }

    #[test]
    fn toml_document() {
        let config = RulesConfig::parse(
            r#"
            [urgency_fee]
            max_delivery_days = 3
            fee_percentage = 35

            [[conditional_visibility]]
            id = "sla_for_enterprise"
            trigger_field = "contract_tier"
            trigger_value = "enterprise"
            targets = ["sla_hours"]
            required = true
            "#,
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.urgency_fee.max_delivery_days, 3.0);
        assert_eq!(config.conditional_visibility.len(), 1);
        assert_eq!(config.conditional_visibility[0].required, Some(true));
        assert_eq!(config.visibility_engine().rule_count(), 2);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = RulesConfig::parse("{ not json", ConfigFormat::Json).unwrap_err();
        assert_eq!(err.code(), "FORM_CONFIG_PARSE");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("rules.TOML")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a/b.json")).unwrap(), ConfigFormat::Json);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("rules.yaml")),
            Err(FormError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn stock_set_round_trips_through_json() {
        let config = RulesConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RulesConfig::parse(&json, ConfigFormat::Json).unwrap(), config);
    }
}
