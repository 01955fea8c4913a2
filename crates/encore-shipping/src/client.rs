//! Melhor Envio quote client.

use crate::{
    declared_value, Parcel, ParcelInput, PostalCode, Quote, ShippingConfig, ShippingError,
};
use encore_data::{FetchClient, Transport};
use serde_json::{json, Value};
use std::sync::Arc;

/// Quotes shipments against Melhor Envio.
#[derive(Debug, Clone)]
pub struct ShippingClient {
    config: ShippingConfig,
    http: FetchClient,
}

impl ShippingClient {
    /// Create a client over a transport.
    pub fn new(config: ShippingConfig, transport: Arc<dyn Transport>) -> Self {
        let http = FetchClient::new(transport)
            .with_default_header("Accept", "application/json")
            .with_default_header("User-Agent", config.user_agent.clone());
        Self { config, http }
    }

    /// Client settings.
    pub fn config(&self) -> &ShippingConfig {
        &self.config
    }

    /// Build the provider payload for an origin, destination and parcels.
    pub fn payload(
        &self,
        origin: &PostalCode,
        destination: &PostalCode,
        parcels: &[ParcelInput],
    ) -> Value {
        json!({
            "from": { "postal_code": origin.as_str() },
            "to": { "postal_code": destination.as_str() },
            "products": Parcel::clamp_all(parcels),
            "options": {
                "insurance_value": declared_value(parcels),
                "receipt": false,
                "own_hand": false,
                "reverse": false,
                "non_commercial": true,
                "platform": self.config.platform,
            },
            "services": self.config.services,
        })
    }

    /// Quote shipping from the configured origin to `destination`.
    pub async fn calculate(
        &self,
        destination: &str,
        parcels: &[ParcelInput],
    ) -> Result<Quote, ShippingError> {
        let token = self.config.token().ok_or_else(|| {
            tracing::error!("shipping token not configured");
            ShippingError::NotConfigured
        })?;

        if destination.trim().is_empty() || parcels.is_empty() {
            return Err(ShippingError::InvalidRequest);
        }

        let (origin, destination) = match (
            PostalCode::parse(&self.config.origin_postal_code),
            PostalCode::parse(destination),
        ) {
            (Some(origin), Some(destination)) => (origin, destination),
            _ => {
                return Err(ShippingError::InvalidPostalCode {
                    origin: PostalCode::digits(&self.config.origin_postal_code),
                    destination: PostalCode::digits(destination),
                })
            }
        };

        let payload = self.payload(&origin, &destination, parcels);
        tracing::debug!(
            origin = %origin,
            destination = %destination,
            parcels = parcels.len(),
            "requesting shipping quote"
        );

        let response = self
            .http
            .post(self.config.calculate_url())
            .bearer_auth(token)
            .json(&payload)?
            .send()
            .await?;

        let body = response.json_value();
        if response.is_success() {
            let quote = Quote::from_value(body);
            tracing::info!(
                destination = %destination,
                options = quote.options.len(),
                available = quote.available().count(),
                "shipping quote received"
            );
            return Ok(quote);
        }

        tracing::warn!(
            provider_status = response.status,
            status_text = response.status_text(),
            "shipping provider returned an error"
        );
        Err(match response.status {
            401 => ShippingError::Authentication { details: body },
            422 => ShippingError::Validation {
                details: body,
                payload,
            },
            status => ShippingError::Provider {
                status,
                status_text: response.status_text().to_string(),
                details: body,
                payload,
            },
        })
    }
}
