//! Scripted transport for tests.

use crate::{FetchError, OutboundRequest, Response, Transport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Replays queued responses in order and records every request.
///
/// # Example
///
/// ```rust,ignore
/// let transport = Arc::new(MockTransport::new());
/// transport.push_json(200, json!({"id": "123"}));
///
/// let client = FetchClient::new(transport.clone());
/// client.get("https://api.test/x").send().await?;
/// assert_eq!(transport.requests()[0].url, "https://api.test/x");
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Response, FetchError>>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl MockTransport {
    /// Create a transport with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn push_response(&self, response: Response) -> &Self {
        guard(&self.responses).push_back(Ok(response));
        self
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: u16, value: serde_json::Value) -> &Self {
        self.push_response(Response::json_body(status, &value))
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: FetchError) -> &Self {
        guard(&self.responses).push_back(Err(error));
        self
    }

    /// Requests sent so far, oldest first.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        guard(&self.requests).clone()
    }

    /// Number of requests sent so far.
    pub fn request_count(&self) -> usize {
        guard(&self.requests).len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<OutboundRequest> {
        guard(&self.requests).last().cloned()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError> {
        guard(&self.requests).push(request);
        guard(&self.responses).pop_front().unwrap_or_else(|| {
            Err(FetchError::RequestError(
                "no mock response queued".to_string(),
            ))
        })
    }
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
