//! Products and the catalog they are quoted from.
//!
//! A [`Product`] knows its form fields, how the chosen options move its base
//! price and which option combinations it rejects. The three known
//! [`ProductType`] families (industrial, residential, corporate) each bring
//! their own; see [`family`].

pub mod catalog;
pub mod error;
pub mod family;
pub mod product;
pub mod product_type;

pub use catalog::{InMemoryCatalog, ProductCatalog};
pub use error::CatalogError;
pub use product::Product;
pub use product_type::ProductType;
