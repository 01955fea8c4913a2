//! Outgoing API responses.

use serde::Serialize;
use serde_json::Value;

/// CORS headers sent with shipping quotes.
pub const SHIPPING_CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "POST"),
    ("access-control-allow-headers", "Content-Type"),
];

/// A response as the API produces it, independent of the host runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Headers with lower-cased names.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// A response without a body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// A JSON response.
    pub fn json(status: u16, value: &Value) -> Self {
        Self::empty(status)
            .with_header("content-type", "application/json")
            .with_body(value.to_string())
    }

    /// A JSON response from any serializable value.
    pub fn serialize<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Self::json(status, &value),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response");
                Self::json(500, &serde_json::json!({ "error": "Erro interno do servidor" }))
            }
        }
    }

    /// 200 with a JSON body.
    pub fn ok(value: &Value) -> Self {
        Self::json(200, value)
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .push((name.into().to_ascii_lowercase(), value.into()));
        self
    }

    /// Add the shipping CORS headers.
    pub fn with_cors(self) -> Self {
        SHIPPING_CORS_HEADERS
            .iter()
            .fold(self, |response, (name, value)| response.with_header(*name, *value))
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// First header with this name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Body as JSON, `Null` when empty or invalid.
    pub fn json_value(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_response() {
        let response = ApiResponse::json(201, &json!({"ok": true}));
        assert_eq!(response.status, 201);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.json_value(), json!({"ok": true}));
    }

    #[test]
    fn test_cors() {
        let response = ApiResponse::empty(204).with_cors();
        assert_eq!(response.header("access-control-allow-origin"), Some("*"));
        assert_eq!(response.header("access-control-allow-methods"), Some("POST"));
        assert_eq!(
            response.header("access-control-allow-headers"),
            Some("Content-Type")
        );
        assert_eq!(response.json_value(), Value::Null);
    }
}
