use quoteform_catalog::CatalogError;

/// Error type for form and quote operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("nenhum produto selecionado")]
    NoProductSelected,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A rules configuration file could not be read.
    #[error("não foi possível ler `{path}`: {message}")]
    ConfigIo { path: String, message: String },

    /// A rules configuration document is malformed.
    #[error("configuração {format} inválida: {message}")]
    ConfigParse {
        format: &'static str,
        message: String,
    },

    #[error("formato de configuração não suportado: `{extension}`")]
    UnsupportedFormat { extension: String },
}

impl FormError {
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::NoProductSelected => "state",
            Self::Catalog(inner) => inner.category(),
            Self::ConfigIo { .. } | Self::ConfigParse { .. } | Self::UnsupportedFormat { .. } => {
                "config"
            }
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::NoProductSelected => "FORM_NO_PRODUCT",
            Self::Catalog(inner) => inner.code(),
            Self::ConfigIo { .. } => "FORM_CONFIG_IO",
            Self::ConfigParse { .. } => "FORM_CONFIG_PARSE",
            Self::UnsupportedFormat { .. } => "FORM_CONFIG_FORMAT",
        }
    }
}
