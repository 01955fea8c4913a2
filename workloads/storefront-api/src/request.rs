//! Incoming API requests.

use crate::ApiError;
use http::Method;
use rand::Rng;
use serde::de::DeserializeOwned;

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A request as the API sees it, independent of the host runtime.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Request id, taken from `x-request-id` or generated.
    pub request_id: String,
    pub method: Method,
    /// Path without the query string.
    pub path: String,
    /// Decoded query parameters, in order.
    pub query: Vec<(String, String)>,
    /// Headers with lower-cased names.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    /// Create a request for a path that may include a query string.
    pub fn new(method: Method, path_with_query: &str) -> Self {
        let (path, query) = match path_with_query.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (path_with_query, Vec::new()),
        };
        Self {
            request_id: generate_request_id(),
            method,
            path: if path.is_empty() { "/" } else { path }.to_string(),
            query,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Add a header. An `x-request-id` header replaces the generated id.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        if name == REQUEST_ID_HEADER && !value.trim().is_empty() {
            self.request_id = value.trim().to_string();
        }
        self.headers.push((name, value));
        self
    }

    /// Set the raw body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a JSON body and content type.
    pub fn with_json(self, value: &serde_json::Value) -> Self {
        self.with_header("content-type", "application/json")
            .with_body(value.to_string())
    }

    /// First header with this name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First query parameter with this name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a cookie, searching every `cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k == "cookie")
            .flat_map(|(_, v)| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.trim())
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            tracing::debug!(error = %e, "rejecting malformed JSON body");
            ApiError::InvalidJson
        })
    }

    /// Parse the body as JSON, treating an empty body as absent.
    pub fn json_opt(&self) -> Result<Option<serde_json::Value>, ApiError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        self.json().map(Some)
    }
}

/// A random request id such as `req_4f9c0a1b2c3d4e5f`.
fn generate_request_id() -> String {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("req_{}", hex)
}

/// Split and decode a query string.
fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key), percent_decode(value))
        })
        .collect()
}

/// Decode `%XX` escapes and `+`; invalid escapes are kept verbatim.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            byte => out.push(byte),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_and_query() {
        let req = ApiRequest::new(Method::GET, "/api/payment_status?id=123&x=a%20b+c");
        assert_eq!(req.path, "/api/payment_status");
        assert_eq!(req.query_param("id"), Some("123"));
        assert_eq!(req.query_param("x"), Some("a b c"));
        assert_eq!(req.query_param("missing"), None);
    }

    #[test]
    fn test_percent_decode_edge_cases() {
        assert_eq!(percent_decode("data.id"), "data.id");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("S%C3%A3o"), "São");
    }

    #[test]
    fn test_request_id_from_header() {
        let generated = ApiRequest::new(Method::GET, "/");
        assert!(generated.request_id.starts_with("req_"));
        assert_eq!(generated.request_id.len(), 20);

        let req = ApiRequest::new(Method::GET, "/").with_header("X-Request-Id", "abc-123");
        assert_eq!(req.request_id, "abc-123");
    }

    #[test]
    fn test_headers_case_insensitive() {
        let req = ApiRequest::new(Method::GET, "/").with_header("Host", "loja.test");
        assert_eq!(req.header("host"), Some("loja.test"));
        assert_eq!(req.header("HOST"), Some("loja.test"));
    }

    #[test]
    fn test_cookie() {
        let req = ApiRequest::new(Method::GET, "/")
            .with_header("Cookie", "theme=dark; encore_session=sess_abc")
            .with_header("Cookie", "other=1");
        assert_eq!(req.cookie("encore_session"), Some("sess_abc"));
        assert_eq!(req.cookie("other"), Some("1"));
        assert_eq!(req.cookie("nope"), None);
    }

    #[test]
    fn test_json_body() {
        let req = ApiRequest::new(Method::POST, "/").with_body("{not json");
        assert!(matches!(
            req.json::<serde_json::Value>(),
            Err(ApiError::InvalidJson)
        ));

        let empty = ApiRequest::new(Method::POST, "/");
        assert_eq!(empty.json_opt().unwrap(), None);
    }
}
