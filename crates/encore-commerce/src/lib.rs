//! Storefront domain types and logic for Encore.
//!
//! This crate provides the types the storefront API is built from:
//!
//! - **Money**: integer minor-unit amounts with currency, lenient amount parsing
//! - **Catalog**: products with parcel dimensions, loaded from TOML
//! - **Cart**: slug-keyed cart with increment/remove/clear and shipping selection
//!
//! # Example
//!
//! ```rust,ignore
//! use encore_commerce::prelude::*;
//!
//! let catalog = Catalog::from_toml_str(include_str!("catalog.toml"))?;
//! let product = catalog.require(&ProductSlug::new("vinil-ao-vivo"))?;
//!
//! let mut cart = Cart::new();
//! cart.add(product)?;
//! cart.add(product)?; // same slug, quantity is now 2
//!
//! println!("Subtotal: {}", cart.subtotal()?);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;

pub use error::CommerceError;
pub use ids::*;
pub use money::{parse_amount, Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{parse_amount, Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, ParcelDimensions, Product};

    // Cart
    pub use crate::cart::{Cart, CartItem, CartParcel, CartSummary, ShippingSelection};

    #[cfg(feature = "storage")]
    pub use crate::cart::CartStore;
}
