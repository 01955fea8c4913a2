//! Mercado Pago client.

use crate::checkout::ValidatedCheckout;
use crate::{
    external_reference, idempotency_key, is_valid_payment_id, CheckoutRequest,
    DirectPaymentRequest, DirectPaymentResponse, PaymentConfig, PaymentError, PaymentOperation,
    PaymentSummary, PixTransactionData, PointOfInteraction, PreferenceResponse, RedirectResponse,
};
use chrono::Utc;
use encore_data::{FetchClient, FetchError, Response, RetryPolicy, Transport};
use serde_json::Value;
use std::sync::Arc;

/// Talks to the Mercado Pago API.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    config: PaymentConfig,
    http: FetchClient,
}

impl PaymentClient {
    /// Create a client over a transport.
    pub fn new(config: PaymentConfig, transport: Arc<dyn Transport>) -> Self {
        let http = FetchClient::new(transport)
            .with_base_url(config.api_base.clone())
            .with_default_header("Accept", "application/json");
        Self { config, http }
    }

    /// Client settings.
    pub fn config(&self) -> &PaymentConfig {
        &self.config
    }

    /// Create a checkout preference for the payment brick.
    ///
    /// `origin` is the storefront's public origin, used for back URLs and
    /// the notification URL.
    pub async fn create_preference(
        &self,
        request: &CheckoutRequest,
        origin: &str,
    ) -> Result<PreferenceResponse, PaymentError> {
        let operation = PaymentOperation::Preference;
        let checkout = request.validate(&self.config, true, operation)?;
        let reference = external_reference();

        let response = self
            .post_preference(&checkout, origin, &reference, true, operation)
            .await?;
        let body = response.json_value();

        if !response.is_success() {
            let message = provider_message(&body, "Erro ao criar preferência de pagamento");
            tracing::error!(
                provider_status = response.status,
                external_reference = %reference,
                message = %message,
                "preference creation failed"
            );
            return Err(PaymentError::Provider {
                operation,
                status: response.status,
                message,
                details: self.config.expose_provider_details.then_some(body),
            });
        }

        let preference_id = id_string(&body).ok_or_else(|| {
            tracing::error!(external_reference = %reference, "preference response without id");
            PaymentError::InvalidProviderResponse(
                "Resposta inválida do servidor de pagamento - ID da preferência não encontrado"
                    .into(),
            )
        })?;

        tracing::info!(
            preference_id = %preference_id,
            external_reference = %reference,
            items = checkout.items.len(),
            "preference created"
        );
        Ok(PreferenceResponse {
            preference_id,
            external_reference: reference,
            init_point: string_field(&body, "init_point"),
            sandbox_init_point: string_field(&body, "sandbox_init_point"),
        })
    }

    /// Create a preference for the redirect checkout.
    pub async fn create_payment(
        &self,
        request: &CheckoutRequest,
        origin: &str,
    ) -> Result<RedirectResponse, PaymentError> {
        let operation = PaymentOperation::RedirectCheckout;
        let checkout = request.validate(&self.config, false, operation)?;
        let reference = external_reference();

        let response = self
            .post_preference(&checkout, origin, &reference, false, operation)
            .await?;
        let body = response.json_value();

        if !response.is_success() {
            let message = provider_message(&body, "Erro ao criar pagamento");
            tracing::error!(
                provider_status = response.status,
                status_text = response.status_text(),
                external_reference = %reference,
                "redirect checkout failed"
            );
            return Err(PaymentError::Provider {
                operation,
                status: response.status,
                message,
                details: Some(body),
            });
        }

        match (id_string(&body), string_field(&body, "init_point")) {
            (Some(preference_id), Some(init_point)) => {
                tracing::info!(preference_id = %preference_id, "redirect checkout created");
                Ok(RedirectResponse {
                    init_point,
                    preference_id,
                    sandbox_init_point: string_field(&body, "sandbox_init_point"),
                })
            }
            _ => {
                tracing::error!(external_reference = %reference, "incomplete preference response");
                Err(PaymentError::InvalidProviderResponse(
                    "Resposta inválida do servidor de pagamento".into(),
                ))
            }
        }
    }

    /// Charge a Pix or card payment.
    pub async fn process_payment(
        &self,
        request: &DirectPaymentRequest,
    ) -> Result<DirectPaymentResponse, PaymentError> {
        let operation = PaymentOperation::DirectPayment;
        let amount = request.transaction_amount(&self.config)?;
        let token = self.token(operation)?;

        let reference = external_reference();
        let body = request.payment_body(&self.config, amount, &reference, Utc::now())?;

        tracing::info!(
            external_reference = %reference,
            pix = request.is_pix(),
            amount,
            "processing payment"
        );
        let response = self
            .http
            .post("/v1/payments")
            .bearer_auth(token)
            .header("X-Idempotency-Key", idempotency_key())
            .json(&body)
            .map_err(|source| PaymentError::Fetch { operation, source })?
            .send()
            .await
            .map_err(|source| fetch_failed(operation, source))?;
        let result = response.json_value();

        if !response.is_success() {
            let message = result
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("Erro no processamento do pagamento")
                .to_string();
            let causes: Vec<Value> = result
                .get("cause")
                .and_then(Value::as_array)
                .map(|causes| {
                    causes
                        .iter()
                        .map(|c| c.get("description").cloned().unwrap_or(Value::Null))
                        .collect()
                })
                .unwrap_or_default();
            tracing::warn!(
                provider_status = response.status,
                external_reference = %reference,
                message = %message,
                "payment rejected by provider"
            );
            return Err(PaymentError::Provider {
                operation,
                status: response.status,
                message,
                details: Some(Value::Array(causes)),
            });
        }

        let field = |name: &str| result.get(name).cloned().unwrap_or(Value::Null);
        let point_of_interaction = if request.is_pix() {
            result
                .get("point_of_interaction")
                .and_then(|p| p.get("transaction_data"))
                .and_then(|data| serde_json::from_value::<PixTransactionData>(data.clone()).ok())
                .map(|transaction_data| PointOfInteraction { transaction_data })
        } else {
            None
        };

        tracing::info!(
            external_reference = %reference,
            payment_id = %field("id"),
            status = %field("status"),
            "payment processed"
        );
        Ok(DirectPaymentResponse {
            success: true,
            id: field("id"),
            status: field("status"),
            status_detail: field("status_detail"),
            point_of_interaction,
        })
    }

    /// Look up a payment by id.
    ///
    /// The lookup is retried once on a 5xx answer or a connection failure.
    pub async fn payment_status(&self, id: Option<&str>) -> Result<PaymentSummary, PaymentError> {
        let operation = PaymentOperation::StatusLookup;
        let id = id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PaymentError::Validation("ID do pagamento é obrigatório".into()))?;
        if !is_valid_payment_id(id) {
            return Err(PaymentError::Validation("ID do pagamento inválido".into()));
        }
        let token = self.token(operation)?;

        let response = self
            .http
            .get(format!("/v1/payments/{}", id))
            .bearer_auth(token)
            .send_with_retry(&RetryPolicy::new(1))
            .await
            .map_err(|source| fetch_failed(operation, source))?;
        let body = response.json_value();

        if !response.is_success() {
            tracing::warn!(
                payment_id = id,
                provider_status = response.status,
                "payment status lookup failed"
            );
            return Err(PaymentError::Provider {
                operation,
                status: response.status,
                message: "Erro ao consultar status do pagamento".into(),
                details: Some(body),
            });
        }

        let summary: PaymentSummary = serde_json::from_value(body)
            .map_err(|e| PaymentError::InvalidProviderResponse(e.to_string()))?;
        tracing::debug!(payment_id = id, status = ?summary.status, "payment status");
        Ok(summary)
    }

    fn token(&self, operation: PaymentOperation) -> Result<&str, PaymentError> {
        self.config.access_token().ok_or_else(|| {
            tracing::error!("payment access token not configured");
            PaymentError::NotConfigured(operation)
        })
    }

    async fn post_preference(
        &self,
        checkout: &ValidatedCheckout,
        origin: &str,
        reference: &str,
        with_metadata: bool,
        operation: PaymentOperation,
    ) -> Result<Response, PaymentError> {
        let token = self.token(operation)?;
        let body =
            checkout.preference_body(&self.config, origin, reference, Utc::now(), with_metadata);

        tracing::debug!(
            external_reference = %reference,
            items = checkout.items.len(),
            total = checkout.total,
            "creating preference"
        );
        self.http
            .post("/checkout/preferences")
            .bearer_auth(token)
            .header("X-Idempotency-Key", idempotency_key())
            .json(&body)
            .map_err(|source| PaymentError::Fetch { operation, source })?
            .send()
            .await
            .map_err(|source| fetch_failed(operation, source))
    }
}

fn fetch_failed(operation: PaymentOperation, source: FetchError) -> PaymentError {
    tracing::error!(error = %source, ?operation, "payment provider unreachable");
    PaymentError::Fetch { operation, source }
}

/// `message`, then the first cause's description or code, then `error`.
/// A present cause never falls through to `error`.
fn provider_message(body: &Value, default: &str) -> String {
    let text = |v: Option<&Value>| match v {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let cause = body
        .get("cause")
        .and_then(Value::as_array)
        .and_then(|causes| causes.first());

    let message = match (text(body.get("message")), cause) {
        (Some(message), _) => Some(message),
        (None, Some(cause)) => text(cause.get("description")).or_else(|| text(cause.get("code"))),
        (None, None) => text(body.get("error")),
    };
    message.unwrap_or_else(|| default.to_string())
}

fn id_string(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_field(body: &Value, name: &str) -> Option<String> {
    body.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
