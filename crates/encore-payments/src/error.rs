//! Payment error types.

use encore_data::FetchError;
use serde_json::{json, Value};
use thiserror::Error;

/// Which flow an error came from; the storefront answers each differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOperation {
    /// Checkout preference (`create_preference`).
    Preference,
    /// Redirect checkout (`create_payment`).
    RedirectCheckout,
    /// Pix or card payment (`process_payment`).
    DirectPayment,
    /// Status lookup (`payment_status`).
    StatusLookup,
}

/// Errors from a payment flow.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Request failed validation; the message is user-facing.
    #[error("{0}")]
    Validation(String),

    /// No access token configured.
    #[error("payment access token not configured")]
    NotConfigured(PaymentOperation),

    /// Transaction total could not be parsed or is not positive.
    #[error("Valor da transação inválido")]
    InvalidAmount,

    /// Card payment without a card token.
    #[error("Token do cartão obrigatório")]
    MissingCardToken,

    /// Provider answered with a non-2xx status.
    #[error("provider error {status}: {message}")]
    Provider {
        operation: PaymentOperation,
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// Provider answered 2xx without the fields we need.
    #[error("{0}")]
    InvalidProviderResponse(String),

    /// Request never completed.
    #[error("payment request failed: {source}")]
    Fetch {
        operation: PaymentOperation,
        source: FetchError,
    },
}

impl PaymentError {
    /// HTTP status to answer with.
    pub fn status(&self) -> u16 {
        match self {
            PaymentError::Validation(_) => 400,
            PaymentError::NotConfigured(_) => 500,
            PaymentError::InvalidAmount => 500,
            PaymentError::MissingCardToken => 400,
            PaymentError::Provider {
                operation, status, ..
            } => match operation {
                PaymentOperation::Preference if (400..500).contains(status) => *status,
                PaymentOperation::Preference => 500,
                PaymentOperation::RedirectCheckout => *status,
                PaymentOperation::DirectPayment | PaymentOperation::StatusLookup => 400,
            },
            PaymentError::InvalidProviderResponse(_) => 500,
            PaymentError::Fetch { .. } => 500,
        }
    }

    /// JSON error body.
    pub fn body(&self) -> Value {
        match self {
            PaymentError::Validation(message) | PaymentError::InvalidProviderResponse(message) => {
                json!({ "error": message })
            }
            PaymentError::NotConfigured(operation) => match operation {
                PaymentOperation::Preference | PaymentOperation::RedirectCheckout => {
                    json!({ "error": "Configuração de pagamento inválida" })
                }
                PaymentOperation::DirectPayment => json!({
                    "error": "Configuração faltando",
                    "message": "Token de acesso ao Mercado Pago não configurado",
                }),
                PaymentOperation::StatusLookup => {
                    json!({ "error": "Token de acesso não configurado" })
                }
            },
            PaymentError::InvalidAmount => json!({
                "error": "Erro no servidor",
                "message": self.to_string(),
            }),
            PaymentError::MissingCardToken => json!({ "error": self.to_string() }),
            PaymentError::Provider {
                operation,
                message,
                details,
                ..
            } => {
                let mut body = match operation {
                    PaymentOperation::Preference | PaymentOperation::RedirectCheckout => {
                        json!({ "error": message })
                    }
                    PaymentOperation::DirectPayment => json!({
                        "error": "Falha no pagamento",
                        "message": message,
                    }),
                    PaymentOperation::StatusLookup => {
                        json!({ "error": "Erro ao consultar status do pagamento" })
                    }
                };
                if let (Some(details), Some(map)) = (details, body.as_object_mut()) {
                    map.insert("details".to_string(), details.clone());
                }
                body
            }
            PaymentError::Fetch { operation, source } => match operation {
                PaymentOperation::Preference | PaymentOperation::RedirectCheckout => {
                    json!({ "error": "Erro interno do servidor" })
                }
                PaymentOperation::DirectPayment => json!({
                    "error": "Erro no servidor",
                    "message": source.to_string(),
                }),
                PaymentOperation::StatusLookup => json!({
                    "error": "Erro interno do servidor",
                    "message": source.to_string(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(operation: PaymentOperation, status: u16, details: Option<Value>) -> PaymentError {
        PaymentError::Provider {
            operation,
            status,
            message: "invalid payer".to_string(),
            details,
        }
    }

    #[test]
    fn test_validation() {
        let err = PaymentError::Validation("Email inválido".to_string());
        assert_eq!(err.status(), 400);
        assert_eq!(err.body(), json!({"error": "Email inválido"}));
    }

    #[test]
    fn test_not_configured_per_operation() {
        assert_eq!(
            PaymentError::NotConfigured(PaymentOperation::Preference).body(),
            json!({"error": "Configuração de pagamento inválida"})
        );
        assert_eq!(
            PaymentError::NotConfigured(PaymentOperation::DirectPayment).body()["error"],
            "Configuração faltando"
        );
        assert_eq!(
            PaymentError::NotConfigured(PaymentOperation::StatusLookup).body(),
            json!({"error": "Token de acesso não configurado"})
        );
    }

    #[test]
    fn test_invalid_amount() {
        let err = PaymentError::InvalidAmount;
        assert_eq!(err.status(), 500);
        assert_eq!(
            err.body(),
            json!({"error": "Erro no servidor", "message": "Valor da transação inválido"})
        );
    }

    #[test]
    fn test_preference_provider_status() {
        assert_eq!(provider(PaymentOperation::Preference, 400, None).status(), 400);
        assert_eq!(provider(PaymentOperation::Preference, 502, None).status(), 500);
        assert_eq!(
            provider(PaymentOperation::Preference, 400, None).body(),
            json!({"error": "invalid payer"})
        );
    }

    #[test]
    fn test_redirect_provider_passes_status_and_details() {
        let err = provider(
            PaymentOperation::RedirectCheckout,
            502,
            Some(json!({"message": "invalid payer"})),
        );
        assert_eq!(err.status(), 502);
        assert_eq!(err.body()["details"]["message"], "invalid payer");
    }

    #[test]
    fn test_direct_payment_provider() {
        let err = provider(
            PaymentOperation::DirectPayment,
            401,
            Some(json!(["Invalid card token"])),
        );
        assert_eq!(err.status(), 400);
        assert_eq!(
            err.body(),
            json!({
                "error": "Falha no pagamento",
                "message": "invalid payer",
                "details": ["Invalid card token"]
            })
        );
    }

    #[test]
    fn test_status_lookup_provider() {
        let err = provider(
            PaymentOperation::StatusLookup,
            404,
            Some(json!({"message": "Payment not found"})),
        );
        assert_eq!(err.status(), 400);
        assert_eq!(err.body()["error"], "Erro ao consultar status do pagamento");
        assert_eq!(err.body()["details"]["message"], "Payment not found");
    }
}
