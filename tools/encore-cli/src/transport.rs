//! Native transport over `reqwest`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use encore_data::{FetchError, Method, OutboundRequest, Response, Transport};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends provider requests from the operator's machine.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError> {
        let mut builder = self
            .client
            .request(method(request.method), request.url.as_str())
            .timeout(REQUEST_TIMEOUT);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                FetchError::InvalidUrl(request.url.clone())
            } else {
                FetchError::RequestError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::ParseError(e.to_string()))?;

        Ok(Response::new(status, headers, body.to_vec()))
    }
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_mapping() {
        assert_eq!(method(Method::Get), reqwest::Method::GET);
        assert_eq!(method(Method::Post), reqwest::Method::POST);
        assert_eq!(method(Method::Options).as_str(), Method::Options.as_str());
    }
}
