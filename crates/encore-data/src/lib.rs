//! Outbound HTTP client for Encore.
//!
//! Requests are built with a small builder API and handed to a [`Transport`].
//! Inside a Spin component that is [`SpinTransport`]; the CLI plugs in its own
//! native transport, and tests use `mock::MockTransport` (feature `mock`).
//!
//! # Example
//!
//! ```rust,ignore
//! use encore_data::{FetchClient, SpinTransport};
//! use std::sync::Arc;
//!
//! let client = FetchClient::new(Arc::new(SpinTransport))
//!     .with_base_url("https://api.mercadopago.com")
//!     .with_default_header("Accept", "application/json");
//!
//! let response = client
//!     .get("/v1/payments/123")
//!     .bearer_auth(token)
//!     .send()
//!     .await?;
//! let payment: serde_json::Value = response.json()?;
//! ```

mod error;
mod request;
mod response;
mod retry;
mod transport;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::FetchError;
pub use request::{Method, OutboundRequest, RequestBuilder};
pub use response::Response;
pub use retry::{RetryCondition, RetryPolicy};
pub use transport::Transport;

#[cfg(target_arch = "wasm32")]
pub use transport::SpinTransport;

use std::collections::HashMap;
use std::sync::Arc;

/// HTTP client for making outbound requests.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn Transport>,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers.keys())
            .finish()
    }
}

impl FetchClient {
    /// Create a new HTTP client over a transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: None,
            default_headers: HashMap::new(),
        }
    }

    /// Create a client with a base URL that will be prepended to relative paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Base URL, if one was set.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            transport: self.transport.clone(),
            builder,
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    transport: Arc<dyn Transport>,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Set the Accept header.
    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// Send the request once.
    pub async fn send(self) -> Result<Response, FetchError> {
        let request = self.builder.build()?;
        tracing::debug!(method = %request.method, url = %request.url, "outbound request");
        let response = self.transport.send(request).await?;
        tracing::debug!(status = response.status, "outbound response");
        Ok(response)
    }

    /// Send the request, re-sending it while the policy allows.
    ///
    /// Only idempotent methods are retried; anything else is sent once.
    pub async fn send_with_retry(self, policy: &RetryPolicy) -> Result<Response, FetchError> {
        let request = self.builder.build()?;
        let retryable = request.method.is_idempotent();
        let mut attempt = 0;

        loop {
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                attempt,
                "outbound request"
            );
            let result = self.transport.send(request.clone()).await;

            let retry = retryable
                && match &result {
                    Ok(response) => policy.should_retry_status(response.status, attempt),
                    Err(error) => policy.should_retry_error(error, attempt),
                };
            if !retry {
                return result;
            }

            match &result {
                Ok(response) => {
                    tracing::warn!(status = response.status, attempt, "retrying request")
                }
                Err(error) => tracing::warn!(error = %error, attempt, "retrying request"),
            }
            attempt += 1;
        }
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Response, RetryPolicy, Transport};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use serde_json::json;

    fn client(transport: &Arc<MockTransport>) -> FetchClient {
        FetchClient::new(transport.clone())
            .with_base_url("https://api.test/")
            .with_default_header("User-Agent", "encore-test")
    }

    #[tokio::test]
    async fn test_base_url_and_default_headers() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"ok": true}));

        let response = client(&transport).get("/v1/items").send().await.unwrap();
        assert!(response.is_success());

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "https://api.test/v1/items");
        assert_eq!(sent.header("user-agent"), Some("encore-test"));
    }

    #[tokio::test]
    async fn test_absolute_url_bypasses_base() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({}));

        client(&transport)
            .get("https://other.test/x")
            .send()
            .await
            .unwrap();
        assert_eq!(transport.requests()[0].url, "https://other.test/x");
    }

    #[tokio::test]
    async fn test_retry_on_server_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(503, json!({}));
        transport.push_json(200, json!({"status": "approved"}));

        let response = client(&transport)
            .get("/v1/payments/1")
            .send_with_retry(&RetryPolicy::new(1))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max() {
        let transport = Arc::new(MockTransport::new());
        transport.push_error(FetchError::RequestError("reset".into()));
        transport.push_error(FetchError::RequestError("reset".into()));
        transport.push_json(200, json!({}));

        let result = client(&transport)
            .get("/v1/payments/1")
            .send_with_retry(&RetryPolicy::new(1))
            .await;

        assert!(matches!(result, Err(FetchError::RequestError(_))));
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_post_is_not_retried() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(500, json!({}));

        let response = client(&transport)
            .post("/v1/payments")
            .json(&json!({"a": 1}))
            .unwrap()
            .send_with_retry(&RetryPolicy::new(3))
            .await
            .unwrap();

        assert_eq!(response.status, 500);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_queue_is_connection_error() {
        let transport = Arc::new(MockTransport::new());
        let result = client(&transport).get("/x").send().await;
        assert!(result.unwrap_err().is_connection_error());
    }
}
