//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Amount could not be parsed or is not positive.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Catalog definition is inconsistent.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Cache error.
    #[error("Cache error: {0}")]
    Cache(String),
}

#[cfg(feature = "storage")]
impl From<encore_cache::CacheError> for CommerceError {
    fn from(e: encore_cache::CacheError) -> Self {
        CommerceError::Cache(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for CommerceError {
    fn from(e: toml::de::Error) -> Self {
        CommerceError::InvalidCatalog(e.to_string())
    }
}
