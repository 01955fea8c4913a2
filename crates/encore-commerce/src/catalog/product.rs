//! Product types.

use crate::ids::{ProductId, ProductSlug};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Physical size of one unit, as the carrier sees it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ParcelDimensions {
    /// Width in centimeters.
    pub width_cm: f64,
    /// Height in centimeters.
    pub height_cm: f64,
    /// Length in centimeters.
    pub length_cm: f64,
    /// Weight in kilograms.
    pub weight_kg: f64,
}

impl Default for ParcelDimensions {
    fn default() -> Self {
        Self {
            width_cm: 20.0,
            height_cm: 10.0,
            length_cm: 30.0,
            weight_kg: 0.5,
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Opaque product identifier.
    pub id: ProductId,
    /// URL-friendly slug (unique, cart key).
    pub slug: ProductSlug,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Image path or URL.
    pub image: Option<String>,
    /// Shipping dimensions of one unit.
    pub dimensions: ParcelDimensions,
}

impl Product {
    /// Create a product with default parcel dimensions.
    pub fn new(
        id: impl Into<ProductId>,
        slug: impl Into<ProductSlug>,
        name: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            name: name.into(),
            price,
            image: None,
            dimensions: ParcelDimensions::default(),
        }
    }

    /// Set the parcel dimensions.
    pub fn with_dimensions(mut self, dimensions: ParcelDimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Set the image.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
