//! Transport seam between the client and the network.

use crate::{FetchError, OutboundRequest, Response};
use async_trait::async_trait;

/// Sends a built request and returns the raw response.
///
/// Futures are not `Send` because Spin's outbound HTTP runs on a
/// single-threaded executor.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError>;
}

/// Transport backed by Spin's outbound HTTP.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinTransport;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl Transport for SpinTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError> {
        use crate::Method;
        use spin_sdk::http::{Method as SpinMethod, Request, Response as SpinResponse};

        let method = match request.method {
            Method::Get => SpinMethod::Get,
            Method::Post => SpinMethod::Post,
            Method::Put => SpinMethod::Put,
            Method::Patch => SpinMethod::Patch,
            Method::Delete => SpinMethod::Delete,
            Method::Head => SpinMethod::Head,
            Method::Options => SpinMethod::Options,
        };

        let mut builder = Request::builder();
        builder.method(method).uri(request.url.as_str());
        for (key, value) in &request.headers {
            builder.header(key.as_str(), value.as_str());
        }
        let outgoing = builder.body(request.body.unwrap_or_default()).build();

        let response: SpinResponse = spin_sdk::http::send(outgoing)
            .await
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        let status = *response.status();
        let headers = response
            .headers()
            .map(|(k, v)| (k.to_string(), v.as_str().unwrap_or("").to_string()))
            .collect();

        Ok(Response::new(status, headers, response.into_body()))
    }
}
