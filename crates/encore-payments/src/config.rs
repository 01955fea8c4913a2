//! Payment provider configuration.

use encore_commerce::Currency;
use serde::{Deserialize, Serialize};

/// Mercado Pago client settings.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaymentConfig {
    /// Access token.
    pub access_token: Option<String>,
    /// API base URL.
    pub api_base: String,
    /// Text shown on the buyer's card statement.
    pub statement_descriptor: String,
    /// Currency for preference items.
    pub currency: Currency,
    /// How long a checkout preference stays valid.
    pub preference_ttl_hours: i64,
    /// How long a Pix QR code stays valid.
    pub pix_expiration_minutes: i64,
    /// Payer email when the buyer didn't give one.
    pub fallback_payer_email: String,
    /// Include raw provider bodies in preference error responses.
    pub expose_provider_details: bool,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_base: "https://api.mercadopago.com".to_string(),
            statement_descriptor: "Felipe Antunes".to_string(),
            currency: Currency::BRL,
            preference_ttl_hours: 24,
            pix_expiration_minutes: 30,
            fallback_payer_email: "test@example.com".to_string(),
            expose_provider_details: false,
        }
    }
}

impl PaymentConfig {
    /// Set the access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Expose provider error bodies to clients.
    pub fn with_provider_details(mut self, expose: bool) -> Self {
        self.expose_provider_details = expose;
        self
    }

    /// Access token, if set and non-empty.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("access_token", &self.access_token().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("statement_descriptor", &self.statement_descriptor)
            .field("currency", &self.currency)
            .field("preference_ttl_hours", &self.preference_ttl_hours)
            .field("pix_expiration_minutes", &self.pix_expiration_minutes)
            .field("fallback_payer_email", &self.fallback_payer_email)
            .field("expose_provider_details", &self.expose_provider_details)
            .finish()
    }
}
