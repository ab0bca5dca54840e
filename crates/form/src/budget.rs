//! Top-level coordinator between a catalog and a form.

use std::sync::Arc;

use quoteform_catalog::{CatalogError, Product, ProductCatalog, ProductType};
use quoteform_rules::pricing::PriceAdjustment;
use serde::Serialize;
use serde_json::Value;

use crate::controller::FormController;
use crate::error::FormError;

/// Snapshot of the current quote, ready to render or serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSummary {
    pub product_id: String,
    pub product_name: String,
    pub product_type: ProductType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub base_price: f64,
    pub final_price: f64,
    pub total_adjustment: f64,
    pub savings: f64,
    pub adjustments: Vec<PriceAdjustment>,
    pub is_valid: bool,
    /// Form errors followed by pricing errors.
    pub errors: Vec<String>,
    pub messages: Vec<String>,
}

/// Lists products, drives the form and produces quote summaries.
#[derive(Debug)]
pub struct BudgetController {
    catalog: Arc<dyn ProductCatalog>,
    form: FormController,
}

impl BudgetController {
    #[must_use]
    pub fn new(catalog: Arc<dyn ProductCatalog>, form: FormController) -> Self {
        Self { catalog, form }
    }

    #[must_use]
    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.catalog.find_all()
    }

    #[must_use]
    pub fn products_by_type(&self, product_type: &ProductType) -> Vec<Product> {
        self.catalog.find_by_type(product_type)
    }

    /// # Errors
    ///
    /// Returns the catalog error when `min > max`.
    pub fn products_in_price_range(&self, min: f64, max: f64) -> Result<Vec<Product>, FormError> {
        Ok(self.catalog.find_by_price_range(min, max)?)
    }

    /// Select a catalog product by id.
    ///
    /// # Errors
    ///
    /// Returns a not-found catalog error for unknown ids.
    pub fn select_product(&mut self, id: &str) -> Result<(), FormError> {
        let product = self
            .catalog
            .find_by_id(id)
            .ok_or_else(|| CatalogError::NotFound { id: id.to_owned() })?;
        self.form.select_product(product);
        Ok(())
    }

    pub fn update_field(&mut self, key: impl Into<String>, value: Value) {
        self.form.update_field(key, value);
    }

    pub fn set_customer_id(&mut self, customer_id: Option<String>) {
        self.form.set_customer_id(customer_id);
    }

    pub fn clear(&mut self) {
        self.form.clear();
    }

    /// Revalidate and price the current form.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NoProductSelected`] when no product is selected.
    pub fn summary(&mut self) -> Result<QuoteSummary, FormError> {
        self.form.validate();
        let pricing = self.form.calculate_price()?;
        let product = self
            .form
            .selected_product()
            .ok_or(FormError::NoProductSelected)?;

        let mut errors: Vec<String> = self.form.errors().values().cloned().collect();
        errors.extend(pricing.errors.iter().cloned());

        Ok(QuoteSummary {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_type: product.product_type.clone(),
            customer_id: self.form.customer_id().map(str::to_owned),
            base_price: pricing.base_price,
            final_price: pricing.final_price,
            total_adjustment: pricing.total_adjustment(),
            savings: pricing.savings_amount(),
            is_valid: self.form.is_valid() && !pricing.has_errors(),
            adjustments: pricing.adjustments,
            errors,
            messages: pricing.messages,
        })
    }
}
