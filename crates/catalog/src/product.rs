use quoteform_field::config::{FormFieldConfig, sort_by_order};
use quoteform_field::values::ValueMap;
use quoteform_rules::keys;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::family;
use crate::product_type::ProductType;

/// A quotable product.
///
/// Products are values: the `with_*` methods return modified copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price before option multipliers.
    pub base_price: f64,
    pub product_type: ProductType,
    #[serde(default)]
    form_fields: Vec<FormFieldConfig>,
}

impl Product {
    /// Create a product carrying its family's default form fields.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_price: f64,
        product_type: impl Into<ProductType>,
    ) -> Self {
        let product_type = product_type.into();
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            base_price,
            form_fields: family::default_fields(&product_type),
            product_type,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_base_price(mut self, base_price: f64) -> Self {
        self.base_price = base_price;
        self
    }

    /// Change the type tag. The form fields are kept as they are.
    #[must_use]
    pub fn with_product_type(mut self, product_type: impl Into<ProductType>) -> Self {
        self.product_type = product_type.into();
        self
    }

    /// Replace every form field.
    #[must_use]
    pub fn with_form_fields(mut self, fields: impl IntoIterator<Item = FormFieldConfig>) -> Self {
        self.form_fields = fields.into_iter().collect();
        self
    }

    /// Add a field, replacing any field with the same key.
    #[must_use]
    pub fn with_field(mut self, field: FormFieldConfig) -> Self {
        match self.form_fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => *existing = field,
            None => self.form_fields.push(field),
        }
        self
    }

    /// Form fields sorted by their `order`.
    #[must_use]
    pub fn form_fields(&self) -> Vec<FormFieldConfig> {
        let mut fields = self.form_fields.clone();
        sort_by_order(&mut fields);
        fields
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FormFieldConfig> {
        self.form_fields.iter().find(|f| f.key == key)
    }

    /// Price for the chosen options before any pricing rule:
    /// unit price × family multipliers × quantity.
    ///
    /// A missing or non-positive quantity counts as one unit.
    #[must_use]
    pub fn calculate_base_price(&self, form_data: &ValueMap) -> f64 {
        let quantity = form_data
            .get_f64(keys::QUANTITY)
            .filter(|q| *q > 0.0)
            .unwrap_or(1.0);
        self.base_price * family::price_multiplier(&self.product_type, form_data) * quantity
    }

    /// Cross-field business rule violations, as user-facing messages.
    #[must_use]
    pub fn validate(&self, form_data: &ValueMap) -> Vec<String> {
        family::validate(&self.product_type, form_data)
    }

    /// Metadata describing this product for a rule context.
    #[must_use]
    pub fn metadata(&self) -> ValueMap {
        ValueMap::new()
            .with(keys::PRODUCT_ID, json!(self.id))
            .with(keys::PRODUCT_TYPE, json!(self.product_type.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quoteform_field::kind::FieldKind;

    fn motor() -> Product {
        Product::new("ind-001", "Motor trifásico", 1000.0, ProductType::Industrial)
    }

    #[test]
    fn fields_are_sorted_by_order() {
        let product = motor().with_field(
            FormFieldConfig::new("serial", "Número de série", FieldKind::Text).with_order(0),
        );
        let keys: Vec<String> = product.form_fields().into_iter().map(|f| f.key).collect();
        assert_eq!(
            keys,
            vec![
                "serial",
                "quantity",
                "delivery_days",
                "voltage",
                "protection_grade",
                "certification",
                "notes"
            ]
        );
    }

    #[test]
    fn with_field_replaces_by_key() {
        let product = motor().with_field(
            FormFieldConfig::new("quantity", "Unidades", FieldKind::Number).with_order(1),
        );
        assert_eq!(product.field("quantity").map(|f| f.label.as_str()), Some("Unidades"));
        assert_eq!(
            product.form_fields().len(),
            motor().form_fields().len()
        );
    }

    #[test]
    fn copies_leave_the_original_untouched() {
        let original = motor();
        let cheaper = original.clone().with_base_price(500.0).with_name("Motor compacto");
        assert_eq!(original.base_price, 1000.0);
        assert_eq!(cheaper.base_price, 500.0);
        assert_eq!(cheaper.id, original.id);
    }

    #[test]
    fn base_price_scales_with_options_and_quantity() {
        let product = motor();
        let data = ValueMap::new()
            .with(keys::QUANTITY, json!(3))
            .with(keys::VOLTAGE, json!(220))
            .with(family::PROTECTION_GRADE, json!("IP54"));
        assert!((product.calculate_base_price(&data) - 3300.0).abs() < 1e-9);
        assert_eq!(product.calculate_base_price(&ValueMap::new()), 1000.0);
    }

    #[test]
    fn metadata_carries_id_and_type() {
        let meta = motor().metadata();
        assert_eq!(meta.get_string(keys::PRODUCT_ID), Some("ind-001"));
        assert_eq!(meta.get_string(keys::PRODUCT_TYPE), Some("industrial"));
    }

    #[test]
    fn deserializes_without_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": "x",
            "name": "X",
            "base_price": 10.0,
            "product_type": "naval"
        }))
        .unwrap();
        assert_eq!(product.product_type, ProductType::Other("naval".into()));
        assert!(product.form_fields().is_empty());
    }
}
