use quoteform_field::values::ValueMap;
use serde::{Deserialize, Serialize};

use crate::keys;

/// Data threaded through one evaluation pass.
///
/// - `form_data`: user input.
/// - `calculated_data`: values computed during the pass (the seeded base
///   price, changes of rules that already ran). Only grows within a pass.
/// - `metadata`: read-only classification (product type, product id,
///   customer id).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleContext {
    form_data: ValueMap,
    calculated_data: ValueMap,
    metadata: ValueMap,
}

impl RuleContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context over existing form data and metadata.
    #[must_use]
    pub fn from_parts(form_data: ValueMap, metadata: ValueMap) -> Self {
        Self {
            form_data,
            calculated_data: ValueMap::new(),
            metadata,
        }
    }

    /// Set a form value (builder-style, consuming).
    #[must_use]
    pub fn with_form_value(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.form_data.set(key, value);
        self
    }

    /// Set a metadata value (builder-style, consuming).
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.set(key, value);
        self
    }

    /// Set a calculated value (builder-style, consuming).
    #[must_use]
    pub fn with_calculated(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.calculated_data.set(key, value);
        self
    }

    /// Copy this context, replacing the maps that are given.
    ///
    /// Maps that are not replaced are cloned, so the copy never shares state
    /// with `self`.
    #[must_use]
    pub fn copy_with(
        &self,
        form_data: Option<ValueMap>,
        calculated_data: Option<ValueMap>,
        metadata: Option<ValueMap>,
    ) -> Self {
        Self {
            form_data: form_data.unwrap_or_else(|| self.form_data.clone()),
            calculated_data: calculated_data.unwrap_or_else(|| self.calculated_data.clone()),
            metadata: metadata.unwrap_or_else(|| self.metadata.clone()),
        }
    }

    #[must_use]
    pub fn form_data(&self) -> &ValueMap {
        &self.form_data
    }

    #[must_use]
    pub fn calculated_data(&self) -> &ValueMap {
        &self.calculated_data
    }

    #[must_use]
    pub fn metadata(&self) -> &ValueMap {
        &self.metadata
    }

    /// Write a calculated value.
    pub fn set_calculated(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.calculated_data.set(key, value);
    }

    /// Merge a rule's changes into the calculated data.
    pub fn merge_calculated(&mut self, changes: &ValueMap) {
        self.calculated_data.extend_from(changes);
    }

    /// Look up a form value.
    #[must_use]
    pub fn form_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.form_data.get(key)
    }

    /// The product type tag from metadata, if set.
    #[must_use]
    pub fn product_type(&self) -> Option<&str> {
        self.metadata.get_string(keys::PRODUCT_TYPE)
    }

    /// The customer id from metadata, if set.
    #[must_use]
    pub fn customer_id(&self) -> Option<&str> {
        self.metadata.get_string(keys::CUSTOMER_ID)
    }

    /// The base price seeded into the calculated data, if any.
    #[must_use]
    pub fn base_price(&self) -> Option<f64> {
        self.calculated_data.get_f64(keys::BASE_PRICE)
    }
}
