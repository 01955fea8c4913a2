//! API error types.

use crate::ApiResponse;
use encore_commerce::CommerceError;
use encore_payments::PaymentError;
use encore_shipping::ShippingError;
use serde_json::{json, Value};
use thiserror::Error;

/// Errors a route can answer with.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON body")]
    InvalidJson,

    /// Request is well-formed but unusable.
    #[error("{0}")]
    BadRequest(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error(transparent)]
    Shipping(#[from] ShippingError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Commerce(#[from] CommerceError),
}

impl ApiError {
    /// HTTP status to answer with.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::NotFound | ApiError::ProductNotFound(_) => 404,
            ApiError::MethodNotAllowed => 405,
            ApiError::InvalidJson | ApiError::BadRequest(_) => 400,
            ApiError::Shipping(e) => e.status(),
            ApiError::Payment(e) => e.status(),
            ApiError::Commerce(e) => match e {
                CommerceError::ProductNotFound(_) => 404,
                CommerceError::InvalidQuantity(_)
                | CommerceError::QuantityExceedsLimit(..)
                | CommerceError::InvalidAmount(_) => 400,
                _ => 500,
            },
        }
    }

    /// JSON error body.
    pub fn body(&self) -> Value {
        match self {
            ApiError::Shipping(e) => e.body(),
            ApiError::Payment(e) => e.body(),
            ApiError::Commerce(e) if self.status() == 500 => {
                tracing::error!(error = %e, "commerce failure");
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        }
    }

    /// Render as a response.
    pub fn into_response(self) -> ApiResponse {
        ApiResponse::json(self.status(), &self.body())
    }
}
