//! Well-known keys shared by rules, products and the form controller.

/// Metadata: product type tag (`industrial`, `residential`, `corporate`, ...).
pub const PRODUCT_TYPE: &str = "product_type";
/// Metadata: id of the selected product.
pub const PRODUCT_ID: &str = "product_id";
/// Metadata: id of the customer requesting the quote.
pub const CUSTOMER_ID: &str = "customer_id";

/// Calculated data: base price seeded before a pricing pass.
pub const BASE_PRICE: &str = "base_price";

/// Form data: number of units.
pub const QUANTITY: &str = "quantity";
/// Form data: requested delivery lead time in days.
pub const DELIVERY_DAYS: &str = "delivery_days";
/// Form data: supply voltage of industrial equipment.
pub const VOLTAGE: &str = "voltage";
/// Form data: whether the customer holds the electrical certification.
pub const CERTIFICATION: &str = "certification";
