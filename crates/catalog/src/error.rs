/// Error type for catalog lookups and updates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("produto `{id}` não encontrado")]
    NotFound { id: String },

    #[error("produto `{id}` já existe")]
    AlreadyExists { id: String },

    /// `min` is greater than `max`.
    #[error("faixa de preço inválida: {min} > {max}")]
    InvalidPriceRange { min: f64, max: f64 },
}

impl CatalogError {
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::NotFound { .. } | Self::AlreadyExists { .. } => "lookup",
            Self::InvalidPriceRange { .. } => "query",
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::NotFound { .. } => "CATALOG_NOT_FOUND",
            Self::AlreadyExists { .. } => "CATALOG_ALREADY_EXISTS",
            Self::InvalidPriceRange { .. } => "CATALOG_INVALID_PRICE_RANGE",
        }
    }
}
