pub mod products;
pub mod quote;

/// Brazilian-real formatting for terminal output.
pub(crate) fn money(value: f64) -> String {
    format!("R$ {value:.2}")
}
