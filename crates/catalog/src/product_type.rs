use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Product classification tag.
///
/// The three known families carry their own form fields, price formula and
/// business rules. Any other tag is accepted and treated as a plain product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductType {
    Industrial,
    Residential,
    Corporate,
    Other(String),
}

impl ProductType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Industrial => "industrial",
            Self::Residential => "residential",
            Self::Corporate => "corporate",
            Self::Other(tag) => tag,
        }
    }

    /// Human-readable name for listings.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Industrial => "Industrial",
            Self::Residential => "Residencial",
            Self::Corporate => "Corporativo",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for ProductType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "industrial" => Self::Industrial,
            "residential" => Self::Residential,
            "corporate" => Self::Corporate,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for ProductType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_owned())
    }
}

impl From<ProductType> for String {
    fn from(product_type: ProductType) -> Self {
        match product_type {
            ProductType::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl FromStr for ProductType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_tags_parse() {
        assert_eq!(ProductType::from("industrial"), ProductType::Industrial);
        assert_eq!(ProductType::from("corporate"), ProductType::Corporate);
        assert_eq!(
            ProductType::from("agricultural"),
            ProductType::Other("agricultural".into())
        );
    }

    #[test]
    fn serializes_as_plain_tag() {
        assert_eq!(serde_json::to_value(ProductType::Residential).unwrap(), json!("residential"));
        let other: ProductType = serde_json::from_value(json!("naval")).unwrap();
        assert_eq!(other.to_string(), "naval");
    }
}
