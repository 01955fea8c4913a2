//! Product catalog module.
//!
//! The store sells a handful of physical goods (records, shirts), so the
//! catalog is a small ordered list loaded from TOML rather than a database.

mod product;

pub use product::{ParcelDimensions, Product};

use crate::error::CommerceError;
use crate::ids::ProductSlug;
use crate::money::{Currency, Money};
use serde::Deserialize;
use std::collections::HashSet;

/// The store's product catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

/// On-disk catalog representation (prices as decimals).
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    products: Vec<ProductRecord>,
}

#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: String,
    slug: String,
    name: String,
    price: f64,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    dimensions: Option<ParcelDimensions>,
}

impl Catalog {
    /// Build a catalog from already-constructed products.
    pub fn new(products: Vec<Product>) -> Result<Self, CommerceError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.slug.clone()) {
                return Err(CommerceError::InvalidCatalog(format!(
                    "duplicate slug: {}",
                    product.slug
                )));
            }
            if !product.price.is_positive() {
                return Err(CommerceError::InvalidCatalog(format!(
                    "non-positive price for {}",
                    product.slug
                )));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from TOML.
    ///
    /// ```toml
    /// currency = "BRL"
    ///
    /// [[products]]
    /// id = "1"
    /// slug = "vinil-ao-vivo"
    /// name = "Vinil Ao Vivo"
    /// price = 149.90
    /// image = "/images/loja/vinil.jpg"
    /// dimensions = { width_cm = 32, height_cm = 2, length_cm = 32, weight_kg = 0.4 }
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, CommerceError> {
        let file: CatalogFile = toml::from_str(content)?;
        let currency = match file.currency.as_deref() {
            Some(code) => Currency::from_code(code).ok_or_else(|| {
                CommerceError::InvalidCatalog(format!("unsupported currency: {}", code))
            })?,
            None => Currency::default(),
        };

        let products = file
            .products
            .into_iter()
            .map(|record| Product {
                id: record.id.into(),
                slug: record.slug.into(),
                name: record.name,
                price: Money::from_decimal(record.price, currency),
                image: record.image,
                dimensions: record.dimensions.unwrap_or_default(),
            })
            .collect();

        Self::new(products)
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Find a product by slug.
    pub fn get(&self, slug: &ProductSlug) -> Option<&Product> {
        self.products.iter().find(|p| &p.slug == slug)
    }

    /// Find a product by slug, failing if it does not exist.
    pub fn require(&self, slug: &ProductSlug) -> Result<&Product, CommerceError> {
        self.get(slug)
            .ok_or_else(|| CommerceError::ProductNotFound(slug.to_string()))
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
currency = "BRL"

[[products]]
id = "1"
slug = "vinil"
name = "Vinil"
price = 149.9
dimensions = { width_cm = 32.0, height_cm = 2.0, length_cm = 32.0, weight_kg = 0.4 }

[[products]]
id = "2"
slug = "camiseta"
name = "Camiseta"
price = 89.9
"#;

    #[test]
    fn test_catalog_from_toml() {
        let catalog = Catalog::from_toml_str(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);

        let vinil = catalog.get(&ProductSlug::new("vinil")).unwrap();
        assert_eq!(vinil.price.amount_cents, 14990);
        assert_eq!(vinil.dimensions.width_cm, 32.0);
    }

    #[test]
    fn test_missing_dimensions_use_defaults() {
        let catalog = Catalog::from_toml_str(CATALOG).unwrap();
        let shirt = catalog.get(&ProductSlug::new("camiseta")).unwrap();
        assert_eq!(shirt.dimensions, ParcelDimensions::default());
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let content = r#"
[[products]]
id = "1"
slug = "a"
name = "A"
price = 10.0

[[products]]
id = "2"
slug = "a"
name = "B"
price = 12.0
"#;
        assert!(matches!(
            Catalog::from_toml_str(content),
            Err(CommerceError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_zero_price_rejected() {
        let content = r#"
[[products]]
id = "1"
slug = "free"
name = "Free"
price = 0.0
"#;
        assert!(Catalog::from_toml_str(content).is_err());
    }

    #[test]
    fn test_require_unknown_slug() {
        let catalog = Catalog::from_toml_str(CATALOG).unwrap();
        let err = catalog.require(&ProductSlug::new("poster")).unwrap_err();
        assert!(matches!(err, CommerceError::ProductNotFound(slug) if slug == "poster"));
    }
}
