//! Form state machine over a single selected product.

use indexmap::IndexMap;
use quoteform_catalog::Product;
use quoteform_field::config::FormFieldConfig;
use quoteform_field::values::ValueMap;
use quoteform_rules::context::RuleContext;
use quoteform_rules::keys;
use quoteform_rules::pricing::PricingResult;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::{RuleEngines, RulesConfig};
use crate::error::FormError;
use crate::listener::{FormChange, ListenerId, Listeners};

/// Drives one quote form.
///
/// With no product selected the form is empty. Selecting a product resets
/// the form to that product's fields; every field update reshapes the
/// visible fields and revalidates. Listeners are notified after each
/// mutation completes.
#[derive(Debug)]
pub struct FormController {
    engines: RuleEngines,
    selected_product: Option<Product>,
    customer_id: Option<String>,
    form_data: ValueMap,
    errors: IndexMap<String, String>,
    fields: Vec<FormFieldConfig>,
    listeners: Listeners,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(RulesConfig::default().build())
    }
}

impl FormController {
    #[must_use]
    pub fn new(engines: RuleEngines) -> Self {
        Self {
            engines,
            selected_product: None,
            customer_id: None,
            form_data: ValueMap::new(),
            errors: IndexMap::new(),
            fields: Vec::new(),
            listeners: Listeners::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &RulesConfig) -> Self {
        Self::new(config.build())
    }

    #[must_use]
    pub fn engines(&self) -> &RuleEngines {
        &self.engines
    }

    #[must_use]
    pub fn selected_product(&self) -> Option<&Product> {
        self.selected_product.as_ref()
    }

    #[must_use]
    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    #[must_use]
    pub fn form_data(&self) -> &ValueMap {
        &self.form_data
    }

    /// Current errors: field key, `product_<i>` or `rule_<i>` → message.
    #[must_use]
    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    /// Every field of the selected product after visibility rules, in form
    /// order.
    #[must_use]
    pub fn fields(&self) -> &[FormFieldConfig] {
        &self.fields
    }

    pub fn visible_fields(&self) -> impl Iterator<Item = &FormFieldConfig> {
        self.fields.iter().filter(|f| f.visible)
    }

    /// True when a product is selected and no error is recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.selected_product.is_some() && self.errors.is_empty()
    }

    /// Select a product. Re-selecting the current product does nothing.
    pub fn select_product(&mut self, product: Product) {
        if self
            .selected_product
            .as_ref()
            .is_some_and(|current| current.id == product.id)
        {
            debug!(product = %product.id, "product already selected");
            return;
        }

        info!(product = %product.id, product_type = %product.product_type, "product selected");
        let product_id = product.id.clone();
        self.selected_product = Some(product);
        self.form_data.clear();
        self.errors.clear();
        self.rebuild_fields();
        self.listeners.emit(&FormChange::ProductSelected { product_id });
    }

    /// Store a field value. Setting the value a field already holds does
    /// nothing.
    pub fn update_field(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if self.form_data.get(&key) == Some(&value) {
            return;
        }

        debug!(field = %key, %value, "field updated");
        self.form_data.set(key.clone(), value);
        self.errors.shift_remove(&key);
        self.rebuild_fields();
        self.validate_form();
        self.listeners.emit(&FormChange::FieldUpdated { key });
    }

    /// Set the customer the quote is for. Drives customer-specific pricing.
    pub fn set_customer_id(&mut self, customer_id: Option<String>) {
        if self.customer_id == customer_id {
            return;
        }
        debug!(customer = ?customer_id, "customer changed");
        self.customer_id = customer_id.clone();
        self.rebuild_fields();
        self.listeners
            .emit(&FormChange::CustomerChanged { customer_id });
    }

    /// Run every check over the current state and return [`is_valid`].
    ///
    /// Field updates already revalidate; this is for checking a form whose
    /// fields were never touched, such as right after product selection.
    ///
    /// [`is_valid`]: Self::is_valid
    pub fn validate(&mut self) -> bool {
        self.validate_form();
        let is_valid = self.is_valid();
        self.listeners.emit(&FormChange::Validated { is_valid });
        is_valid
    }

    /// Price the current form.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NoProductSelected`] when no product is selected.
    pub fn calculate_price(&self) -> Result<PricingResult, FormError> {
        let product = self
            .selected_product
            .as_ref()
            .ok_or(FormError::NoProductSelected)?;
        let base_price = product.calculate_base_price(&self.form_data);
        Ok(self
            .engines
            .pricing
            .calculate_final_price(base_price, self.context()))
    }

    /// Drop the product and everything entered for it.
    pub fn clear(&mut self) {
        self.selected_product = None;
        self.form_data.clear();
        self.errors.clear();
        self.fields.clear();
        self.listeners.emit(&FormChange::Cleared);
    }

    pub fn add_listener(
        &mut self,
        listener: impl Fn(&FormChange) + Send + Sync + 'static,
    ) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Rule context over the current form data, product and customer.
    #[must_use]
    pub fn context(&self) -> RuleContext {
        let mut metadata = self
            .selected_product
            .as_ref()
            .map(Product::metadata)
            .unwrap_or_default();
        if let Some(customer_id) = &self.customer_id {
            metadata.set(keys::CUSTOMER_ID, json!(customer_id));
        }
        RuleContext::from_parts(self.form_data.clone(), metadata)
    }

    fn rebuild_fields(&mut self) {
        let Some(product) = &self.selected_product else {
            self.fields.clear();
            return;
        };
        let base = product.form_fields();
        self.fields = self
            .engines
            .visibility
            .apply_visibility_rules(&base, &self.context());
    }

    fn validate_form(&mut self) {
        self.errors.clear();
        let Some(product) = &self.selected_product else {
            return;
        };

        for field in self.fields.iter().filter(|f| f.visible) {
            if let Err(err) = field.validate(self.form_data.get(&field.key)) {
                self.errors.insert(field.key.clone(), err.to_string());
            }
        }
        for (index, message) in product.validate(&self.form_data).into_iter().enumerate() {
            self.errors.insert(format!("product_{index}"), message);
        }
        let rules = self.engines.validation.validate_all(self.context());
        for (index, message) in rules.errors.into_iter().enumerate() {
            self.errors.insert(format!("rule_{index}"), message);
        }

        debug!(errors = self.errors.len(), "form validated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quoteform_catalog::ProductType;
    use std::sync::{Arc, Mutex};

    fn motor() -> Product {
        Product::new("ind-001", "Motor", 1000.0, ProductType::Industrial)
    }

    fn recorder(form: &mut FormController) -> Arc<Mutex<Vec<FormChange>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        form.add_listener(move |change| sink.lock().unwrap().push(change.clone()));
        seen
    }

    #[test]
    fn starts_empty_and_invalid() {
        let form = FormController::default();
        assert!(form.selected_product().is_none());
        assert!(form.fields().is_empty());
        assert!(!form.is_valid());
        assert_eq!(form.calculate_price().unwrap_err(), FormError::NoProductSelected);
    }

    #[test]
    fn reselecting_same_product_is_a_noop() {
        let mut form = FormController::default();
        let seen = recorder(&mut form);

        form.select_product(motor());
        form.update_field(keys::QUANTITY, json!(5));
        form.select_product(motor().with_name("Outro nome"));

        assert_eq!(form.form_data().get(keys::QUANTITY), Some(&json!(5)));
        assert_eq!(form.selected_product().map(|p| p.name.as_str()), Some("Motor"));
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn selecting_another_product_resets_the_form() {
        let mut form = FormController::default();
        form.select_product(motor());
        form.update_field(keys::QUANTITY, json!(0));
        assert!(!form.errors().is_empty());

        form.select_product(Product::new("res-001", "Split", 1800.0, ProductType::Residential));
        assert!(form.form_data().is_empty());
        assert!(form.errors().is_empty());
        assert!(form.fields().iter().any(|f| f.key == "color"));
    }

    #[test]
    fn unchanged_value_does_not_notify() {
        let mut form = FormController::default();
        form.select_product(motor());
        let seen = recorder(&mut form);

        form.update_field(keys::QUANTITY, json!(10));
        form.update_field(keys::QUANTITY, json!(10));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![FormChange::FieldUpdated { key: keys::QUANTITY.into() }]
        );
    }

    #[test]
    fn clear_returns_to_no_product() {
        let mut form = FormController::default();
        form.select_product(motor());
        form.update_field(keys::QUANTITY, json!(3));
        form.clear();

        assert!(form.selected_product().is_none());
        assert!(form.form_data().is_empty());
        assert!(form.fields().is_empty());
        assert!(!form.is_valid());
    }

    #[test]
    fn removed_listener_is_not_called() {
        let mut form = FormController::default();
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        let id = form.add_listener(move |_| *counter.lock().unwrap() += 1);
        assert!(form.remove_listener(id));

        form.select_product(motor());
        assert_eq!(*seen.lock().unwrap(), 0);
    }
}
