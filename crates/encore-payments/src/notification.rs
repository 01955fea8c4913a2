//! Webhook notifications.

use serde_json::Value;

/// A payment notification posted to the webhook URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentNotification {
    /// Notification type, e.g. `"payment"`.
    pub kind: Option<String>,
    /// Id of the resource that changed.
    pub data_id: String,
}

impl PaymentNotification {
    /// Parse from the JSON body, falling back to query parameters.
    ///
    /// Accepts `{type, data:{id}}` bodies and `?type=&data.id=` or the older
    /// `?topic=&id=` query form. Returns `None` when no id is present.
    pub fn parse(body: Option<&Value>, query: &[(String, String)]) -> Option<Self> {
        if let Some(notification) = body.and_then(Self::from_body) {
            return Some(notification);
        }
        Self::from_query(query)
    }

    /// Whether this notification concerns a payment.
    pub fn is_payment(&self) -> bool {
        matches!(self.kind.as_deref(), None | Some("payment"))
    }

    fn from_body(body: &Value) -> Option<Self> {
        let data_id = match body.get("data").and_then(|d| d.get("id"))? {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let kind = body
            .get("type")
            .or_else(|| body.get("topic"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self { kind, data_id })
    }

    fn from_query(query: &[(String, String)]) -> Option<Self> {
        let find = |name: &str| {
            query
                .iter()
                .find(|(k, v)| k == name && !v.is_empty())
                .map(|(_, v)| v.clone())
        };
        let data_id = find("data.id").or_else(|| find("id"))?;
        let kind = find("type").or_else(|| find("topic"));
        Some(Self { kind, data_id })
    }
}
