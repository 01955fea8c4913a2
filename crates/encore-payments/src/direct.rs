//! Direct (Pix and card) payments.

use crate::checkout::iso_millis;
use crate::{PaymentConfig, PaymentError};
use chrono::{DateTime, Duration, Utc};
use encore_commerce::parse_amount;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Maximum length of the item-name part of the payment description.
const MAX_DESCRIPTION_NAMES_CHARS: usize = 200;

/// Payment request as posted by the browser's payment brick.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DirectPaymentRequest {
    /// Card token from the browser SDK.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// `"pix"` selects Pix; anything else is a card payment.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Card brand, e.g. `"visa"` or `"master"`.
    #[serde(default)]
    pub payment_method_id: Option<String>,
    #[serde(default)]
    pub issuer_id: Option<Value>,
    #[serde(default)]
    pub installments: Option<Value>,
    #[serde(default)]
    pub cart: Vec<Value>,
    /// Order total, as a number or a string like `"149,90"`.
    #[serde(default)]
    pub total: Option<Value>,
}

impl std::fmt::Debug for DirectPaymentRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectPaymentRequest")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("payment_method", &self.payment_method)
            .field("payment_method_id", &self.payment_method_id)
            .field("installments", &self.installments)
            .field("items", &self.cart.len())
            .field("total", &self.total)
            .finish()
    }
}

/// Pix QR code data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixTransactionData {
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub qr_code_base64: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInteraction {
    pub transaction_data: PixTransactionData,
}

/// Successful payment response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectPaymentResponse {
    pub success: bool,
    pub id: Value,
    pub status: Value,
    pub status_detail: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_of_interaction: Option<PointOfInteraction>,
}

impl DirectPaymentRequest {
    /// Whether the buyer chose Pix.
    pub fn is_pix(&self) -> bool {
        self.payment_method.as_deref() == Some("pix")
    }

    /// Parse the order total, rounded to cents.
    pub(crate) fn transaction_amount(&self, config: &PaymentConfig) -> Result<f64, PaymentError> {
        let text = match &self.total {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(PaymentError::InvalidAmount),
        };
        parse_amount(&text, config.currency)
            .map(|money| money.to_decimal())
            .map_err(|_| PaymentError::InvalidAmount)
    }

    /// `"Compra na loja - "` followed by the item names.
    pub(crate) fn description(&self) -> String {
        let names = self
            .cart
            .iter()
            .map(|item| match item.get("name") {
                Some(Value::String(s)) => s.clone(),
                None | Some(Value::Null) => String::new(),
                Some(other) => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let names: String = names.chars().take(MAX_DESCRIPTION_NAMES_CHARS).collect();
        format!("Compra na loja - {}", names)
    }

    /// Build the provider body.
    pub(crate) fn payment_body(
        &self,
        config: &PaymentConfig,
        amount: f64,
        external_reference: &str,
        now: DateTime<Utc>,
    ) -> Result<Value, PaymentError> {
        let email = self
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(&config.fallback_payer_email);

        let mut body = json!({
            "transaction_amount": amount,
            "description": self.description(),
            "payer": { "email": email },
            "external_reference": external_reference,
        });
        let Some(map) = body.as_object_mut() else {
            return Ok(body);
        };

        if self.is_pix() {
            let expires_at = now + Duration::minutes(config.pix_expiration_minutes);
            map.insert("payment_method_id".into(), json!("pix"));
            map.insert("date_of_expiration".into(), json!(iso_millis(expires_at)));
            return Ok(body);
        }

        let token = self
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(PaymentError::MissingCardToken)?;
        let method = self
            .payment_method_id
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or("visa");
        let installments = match &self.installments {
            Some(v) if truthy(v) => v.clone(),
            _ => json!(1),
        };

        map.insert("token".into(), json!(token));
        map.insert("payment_method_id".into(), json!(method));
        map.insert("installments".into(), installments);
        if let Some(issuer) = self.issuer_id.as_ref().filter(|v| truthy(v)) {
            map.insert("issuer_id".into(), issuer.clone());
        }
        Ok(body)
    }
}

/// JSON truthiness for optional client fields.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
