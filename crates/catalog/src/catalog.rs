use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::CatalogError;
use crate::product::Product;
use crate::product_type::ProductType;

/// Read access to the products a quote can be made for.
pub trait ProductCatalog: std::fmt::Debug + Send + Sync {
    /// Every product, in catalog order.
    fn find_all(&self) -> Vec<Product>;

    fn find_by_id(&self, id: &str) -> Option<Product>;

    fn find_by_type(&self, product_type: &ProductType) -> Vec<Product>;

    /// Products whose unit price lies in `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidPriceRange`] when `min > max`.
    fn find_by_price_range(&self, min: f64, max: f64) -> Result<Vec<Product>, CatalogError>;
}

/// Process-local catalog keeping products in insertion order.
///
/// Shared behind an `Arc`; updates take a write lock.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<IndexMap<String, Product>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog seeded with one product of each known family.
    #[must_use]
    pub fn with_default_products() -> Self {
        let catalog = Self::new();
        {
            let mut products = catalog.products.write();
            for product in default_products() {
                products.insert(product.id.clone(), product);
            }
        }
        catalog
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AlreadyExists`] when the id is taken.
    pub fn insert(&self, product: Product) -> Result<(), CatalogError> {
        let mut products = self.products.write();
        if products.contains_key(&product.id) {
            return Err(CatalogError::AlreadyExists { id: product.id });
        }
        debug!(product = %product.id, "product added to catalog");
        products.insert(product.id.clone(), product);
        Ok(())
    }

    /// Remove a product, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when no product has the id.
    pub fn remove(&self, id: &str) -> Result<Product, CatalogError> {
        self.products
            .write()
            .shift_remove(id)
            .ok_or_else(|| CatalogError::NotFound { id: id.to_owned() })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn find_all(&self) -> Vec<Product> {
        self.products.read().values().cloned().collect()
    }

    fn find_by_id(&self, id: &str) -> Option<Product> {
        self.products.read().get(id).cloned()
    }

    fn find_by_type(&self, product_type: &ProductType) -> Vec<Product> {
        self.products
            .read()
            .values()
            .filter(|p| &p.product_type == product_type)
            .cloned()
            .collect()
    }

    fn find_by_price_range(&self, min: f64, max: f64) -> Result<Vec<Product>, CatalogError> {
        if min > max {
            return Err(CatalogError::InvalidPriceRange { min, max });
        }
        Ok(self
            .products
            .read()
            .values()
            .filter(|p| (min..=max).contains(&p.base_price))
            .cloned()
            .collect())
    }
}

fn default_products() -> Vec<Product> {
    vec![
        Product::new("ind-001", "Motor Elétrico Trifásico", 2500.0, ProductType::Industrial)
            .with_description("Motor de indução para aplicações industriais"),
        Product::new("res-001", "Ar-Condicionado Split", 1800.0, ProductType::Residential)
            .with_description("Split inverter para ambientes residenciais"),
        Product::new("corp-001", "Plataforma de Gestão", 5000.0, ProductType::Corporate)
            .with_description("Licença anual de software de gestão empresarial"),
    ]
}
