//! Shipping error types.

use encore_data::FetchError;
use serde_json::{json, Value};
use thiserror::Error;

/// Errors from a shipping quote.
#[derive(Error, Debug)]
pub enum ShippingError {
    /// No access token configured.
    #[error("Melhor Envio personal access token not configured")]
    NotConfigured,

    /// Destination or parcels missing.
    #[error("postalCode and products are required")]
    InvalidRequest,

    /// Origin or destination is not 8 digits.
    #[error("Invalid postal code format. Must be 8 digits.")]
    InvalidPostalCode { origin: String, destination: String },

    /// Provider rejected the token (401).
    #[error("Authentication failed")]
    Authentication { details: Value },

    /// Provider rejected the payload (422).
    #[error("Validation error")]
    Validation { details: Value, payload: Value },

    /// Any other provider failure.
    #[error("API error: {status} {status_text}")]
    Provider {
        status: u16,
        status_text: String,
        details: Value,
        payload: Value,
    },

    /// Request never completed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ShippingError {
    /// HTTP status to answer with.
    pub fn status(&self) -> u16 {
        match self {
            ShippingError::NotConfigured => 500,
            ShippingError::InvalidRequest => 400,
            ShippingError::InvalidPostalCode { .. } => 400,
            ShippingError::Authentication { .. } => 401,
            ShippingError::Validation { .. } => 422,
            ShippingError::Provider { status, .. } => *status,
            ShippingError::Fetch(_) => 500,
        }
    }

    /// JSON error body.
    pub fn body(&self) -> Value {
        match self {
            ShippingError::NotConfigured | ShippingError::InvalidRequest => {
                json!({ "error": self.to_string() })
            }
            ShippingError::InvalidPostalCode {
                origin,
                destination,
            } => json!({
                "error": self.to_string(),
                "origin": origin,
                "destination": destination,
            }),
            ShippingError::Authentication { details } => json!({
                "error": "Authentication failed",
                "message": "The API token is invalid or expired. Please check your Melhor Envio token.",
                "details": details,
            }),
            ShippingError::Validation { details, payload } => json!({
                "error": "Validation error",
                "message": "Invalid data sent to API",
                "details": details,
                "payload": payload,
            }),
            ShippingError::Provider {
                status,
                status_text,
                details,
                payload,
            } => json!({
                "error": "API error",
                "status": status,
                "statusText": status_text,
                "details": details,
                "payload": payload,
            }),
            ShippingError::Fetch(e) => json!({ "error": e.to_string() }),
        }
    }
}
