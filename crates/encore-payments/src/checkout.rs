//! Checkout preference requests and bodies.

use crate::{PaymentConfig, PaymentError, PaymentOperation};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Maximum item title length the provider accepts.
const MAX_TITLE_CHARS: usize = 256;

/// Checkout request as posted by the browser.
///
/// Fields stay untyped so that malformed carts produce the user-facing
/// validation messages instead of a generic JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
}

/// A validated preference item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutItem {
    pub title: String,
    #[serde(serialize_with = "serialize_quantity")]
    pub quantity: f64,
    pub unit_price: f64,
    pub currency_id: String,
}

/// Successful preference response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceResponse {
    pub preference_id: String,
    pub external_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox_init_point: Option<String>,
}

/// Successful redirect checkout response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub init_point: String,
    pub preference_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox_init_point: Option<String>,
}

/// Validated checkout, ready to become a preference body.
#[derive(Debug, Clone)]
pub(crate) struct ValidatedCheckout {
    pub items: Vec<CheckoutItem>,
    pub email: String,
    pub total: f64,
}

impl CheckoutRequest {
    /// Validate the cart and email.
    ///
    /// `whole_quantities` rejects fractional quantities; the redirect flow
    /// only requires them to be positive.
    pub(crate) fn validate(
        &self,
        config: &PaymentConfig,
        whole_quantities: bool,
        operation: PaymentOperation,
    ) -> Result<ValidatedCheckout, PaymentError> {
        let entries = match &self.cart {
            Some(Value::Array(entries)) if !entries.is_empty() => entries,
            _ => return Err(PaymentError::Validation("Carrinho vazio ou inválido".into())),
        };

        let email = match &self.email {
            Some(Value::String(email)) if email.contains('@') => email.clone(),
            _ => return Err(PaymentError::Validation("Email inválido".into())),
        };

        if config.access_token().is_none() {
            tracing::error!("payment access token not configured");
            return Err(PaymentError::NotConfigured(operation));
        }

        let items = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| validate_item(index + 1, entry, config, whole_quantities))
            .collect::<Result<Vec<_>, _>>()?;

        let total: f64 = items.iter().map(|i| i.unit_price * i.quantity).sum();
        if total <= 0.0 {
            return Err(PaymentError::Validation(
                "Valor total do pedido deve ser maior que zero".into(),
            ));
        }

        Ok(ValidatedCheckout {
            items,
            email,
            total,
        })
    }
}

impl ValidatedCheckout {
    /// Build the preference body.
    pub(crate) fn preference_body(
        &self,
        config: &PaymentConfig,
        origin: &str,
        external_reference: &str,
        now: DateTime<Utc>,
        with_metadata: bool,
    ) -> Value {
        let origin = origin.trim_end_matches('/');
        let expires_at = now + Duration::hours(config.preference_ttl_hours);

        let mut body = json!({
            "items": self.items,
            "payer": { "email": self.email },
            "back_urls": {
                "success": format!("{}/sucesso", origin),
                "failure": format!("{}/falha", origin),
                "pending": format!("{}/pendente", origin),
            },
            "auto_return": "approved",
            "notification_url": format!("{}/api/webhooks/mercadopago", origin),
            "statement_descriptor": config.statement_descriptor,
            "external_reference": external_reference,
            "expires": true,
            "expiration_date_from": iso_millis(now),
            "expiration_date_to": iso_millis(expires_at),
            "binary_mode": false,
            "marketplace": "NONE",
        });

        if with_metadata {
            if let Some(map) = body.as_object_mut() {
                map.insert(
                    "metadata".to_string(),
                    json!({
                        "created_at": iso_millis(now),
                        "total_items": self.items.len(),
                        "total_amount": self.total,
                    }),
                );
            }
        }
        body
    }
}

/// ISO-8601 in UTC with milliseconds, e.g. `2026-10-17T12:00:00.000Z`.
pub(crate) fn iso_millis(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn validate_item(
    position: usize,
    entry: &Value,
    config: &PaymentConfig,
    whole_quantities: bool,
) -> Result<CheckoutItem, PaymentError> {
    let name = entry.get("name").and_then(display_name);
    let price = entry.get("price").filter(|v| !v.is_null());
    let quantity = entry.get("quantity").filter(|v| !v.is_null());

    let (name, price, quantity) = match (name, price, quantity) {
        (Some(name), Some(price), Some(quantity)) => (name, price, quantity),
        _ => {
            return Err(PaymentError::Validation(format!(
                "Item {} está incompleto - nome, preço e quantidade são obrigatórios",
                position
            )))
        }
    };

    let price = match as_number(price) {
        Some(p) if p > 0.0 => p,
        _ => {
            return Err(PaymentError::Validation(format!(
                "Preço inválido no item \"{}\" - deve ser um número maior que zero",
                name
            )))
        }
    };

    let quantity = match as_number(quantity) {
        Some(q) if q > 0.0 && (!whole_quantities || q.fract() == 0.0) => q,
        _ => {
            return Err(PaymentError::Validation(format!(
                "Quantidade inválida no item \"{}\" - deve ser um número inteiro maior que zero",
                name
            )))
        }
    };

    Ok(CheckoutItem {
        title: name.chars().take(MAX_TITLE_CHARS).collect(),
        quantity,
        unit_price: price,
        currency_id: config.currency.code().to_string(),
    })
}

/// Non-empty name, accepting numbers the way a loosely-typed client sends them.
fn display_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers or numeric strings.
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn serialize_quantity<S: serde::Serializer>(
    quantity: &f64,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if quantity.fract() == 0.0 && *quantity <= i64::MAX as f64 {
        serializer.serialize_i64(*quantity as i64)
    } else {
        serializer.serialize_f64(*quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> PaymentConfig {
        PaymentConfig::default().with_access_token("TEST-token")
    }

    fn request(cart: Value, email: &str) -> CheckoutRequest {
        CheckoutRequest {
            cart: Some(cart),
            email: Some(json!(email)),
        }
    }

    fn validate(req: &CheckoutRequest) -> Result<ValidatedCheckout, PaymentError> {
        req.validate(&config(), true, PaymentOperation::Preference)
    }

    fn message(err: PaymentError) -> String {
        match err {
            PaymentError::Validation(m) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_cart() {
        let err = validate(&request(json!([]), "a@b.c")).unwrap_err();
        assert_eq!(message(err), "Carrinho vazio ou inválido");

        let err = validate(&CheckoutRequest::default()).unwrap_err();
        assert_eq!(message(err), "Carrinho vazio ou inválido");
    }

    #[test]
    fn test_invalid_email() {
        let cart = json!([{"name": "Vinil", "price": 10, "quantity": 1}]);
        let err = validate(&request(cart.clone(), "no-at-sign")).unwrap_err();
        assert_eq!(message(err), "Email inválido");

        let req = CheckoutRequest {
            cart: Some(cart),
            email: Some(json!(42)),
        };
        assert_eq!(message(validate(&req).unwrap_err()), "Email inválido");
    }

    #[test]
    fn test_missing_token_checked_after_email() {
        let req = request(json!([{"name": "Vinil", "price": 10, "quantity": 1}]), "a@b.c");
        let err = req
            .validate(&PaymentConfig::default(), true, PaymentOperation::Preference)
            .unwrap_err();
        assert!(matches!(
            err,
            PaymentError::NotConfigured(PaymentOperation::Preference)
        ));
    }

    #[test]
    fn test_incomplete_item() {
        let req = request(
            json!([
                {"name": "Vinil", "price": 10, "quantity": 1},
                {"name": "Camiseta", "quantity": 1}
            ]),
            "a@b.c",
        );
        assert_eq!(
            message(validate(&req).unwrap_err()),
            "Item 2 está incompleto - nome, preço e quantidade são obrigatórios"
        );
    }

    #[test]
    fn test_invalid_price() {
        let req = request(json!([{"name": "Vinil", "price": "abc", "quantity": 1}]), "a@b.c");
        assert_eq!(
            message(validate(&req).unwrap_err()),
            "Preço inválido no item \"Vinil\" - deve ser um número maior que zero"
        );

        let req = request(json!([{"name": "Vinil", "price": 0, "quantity": 1}]), "a@b.c");
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_fractional_quantity() {
        let req = request(json!([{"name": "Vinil", "price": 10, "quantity": 1.5}]), "a@b.c");
        assert_eq!(
            message(validate(&req).unwrap_err()),
            "Quantidade inválida no item \"Vinil\" - deve ser um número inteiro maior que zero"
        );

        let lenient = req
            .validate(&config(), false, PaymentOperation::RedirectCheckout)
            .unwrap();
        assert_eq!(lenient.items[0].quantity, 1.5);
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let req = request(
            json!([{"name": "Vinil", "price": "149.90", "quantity": "2"}]),
            "a@b.c",
        );
        let checkout = validate(&req).unwrap();
        assert_eq!(checkout.items[0].unit_price, 149.9);
        assert_eq!(checkout.items[0].quantity, 2.0);
        assert!((checkout.total - 299.8).abs() < 1e-9);
    }

    #[test]
    fn test_title_truncated() {
        let long = "x".repeat(300);
        let req = request(json!([{"name": long, "price": 1, "quantity": 1}]), "a@b.c");
        let checkout = validate(&req).unwrap();
        assert_eq!(checkout.items[0].title.chars().count(), 256);
    }

    #[test]
    fn test_preference_body() {
        let req = request(
            json!([{"name": "Vinil", "price": 149.9, "quantity": 2}]),
            "fan@example.com",
        );
        let checkout = validate(&req).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();

        let body =
            checkout.preference_body(&config(), "https://loja.test/", "order_1_abc", now, true);

        assert_eq!(body["items"][0]["title"], "Vinil");
        assert_eq!(body["items"][0]["quantity"], 2);
        assert_eq!(body["items"][0]["currency_id"], "BRL");
        assert_eq!(body["payer"]["email"], "fan@example.com");
        assert_eq!(body["back_urls"]["success"], "https://loja.test/sucesso");
        assert_eq!(body["back_urls"]["failure"], "https://loja.test/falha");
        assert_eq!(body["back_urls"]["pending"], "https://loja.test/pendente");
        assert_eq!(
            body["notification_url"],
            "https://loja.test/api/webhooks/mercadopago"
        );
        assert_eq!(body["auto_return"], "approved");
        assert_eq!(body["statement_descriptor"], "Felipe Antunes");
        assert_eq!(body["external_reference"], "order_1_abc");
        assert_eq!(body["expires"], true);
        assert_eq!(body["expiration_date_from"], "2026-10-17T12:00:00.000Z");
        assert_eq!(body["expiration_date_to"], "2026-10-18T12:00:00.000Z");
        assert_eq!(body["binary_mode"], false);
        assert_eq!(body["marketplace"], "NONE");
        assert_eq!(body["metadata"]["total_items"], 1);
        assert_eq!(body["metadata"]["created_at"], "2026-10-17T12:00:00.000Z");
    }

    #[test]
    fn test_body_without_metadata() {
        let req = request(json!([{"name": "Vinil", "price": 10, "quantity": 1}]), "a@b.c");
        let checkout = validate(&req).unwrap();
        let body =
            checkout.preference_body(&config(), "http://localhost:3000", "r", Utc::now(), false);
        assert!(body.get("metadata").is_none());
    }
}
