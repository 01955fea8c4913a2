//! Retry policies for outbound requests.
//!
//! Attempts are sent back to back; the component runtime has no timer.

use crate::FetchError;

/// Conditions that trigger a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCondition {
    /// Retry on specific HTTP status code.
    StatusCode(u16),
    /// Retry on any 5xx status.
    ServerError,
    /// Retry when no response was received.
    ConnectionError,
}

impl RetryCondition {
    /// Check if a status code matches this condition.
    pub fn matches_status(&self, status: u16) -> bool {
        match self {
            Self::StatusCode(code) => status == *code,
            Self::ServerError => (500..600).contains(&status),
            Self::ConnectionError => false,
        }
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Conditions that trigger retry.
    pub retry_on: Vec<RetryCondition>,
}

impl RetryPolicy {
    /// Retry up to `max_retries` times on 5xx and connection errors.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            retry_on: vec![RetryCondition::ServerError, RetryCondition::ConnectionError],
        }
    }

    /// Create a policy with no retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            retry_on: Vec::new(),
        }
    }

    /// Set retry conditions.
    pub fn with_conditions(mut self, conditions: Vec<RetryCondition>) -> Self {
        self.retry_on = conditions;
        self
    }

    /// Check if should retry based on status code.
    ///
    /// `attempt` is the zero-based index of the attempt that just finished.
    pub fn should_retry_status(&self, status: u16, attempt: u32) -> bool {
        attempt < self.max_retries && self.retry_on.iter().any(|c| c.matches_status(status))
    }

    /// Check if should retry after a transport error.
    pub fn should_retry_error(&self, error: &FetchError, attempt: u32) -> bool {
        attempt < self.max_retries
            && error.is_connection_error()
            && self.retry_on.contains(&RetryCondition::ConnectionError)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retries_once_on_server_error() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry_status(503, 0));
        assert!(!policy.should_retry_status(503, 1));
        assert!(!policy.should_retry_status(404, 0));
    }

    #[test]
    fn test_connection_errors() {
        let policy = RetryPolicy::new(2);
        let error = FetchError::RequestError("reset".to_string());
        assert!(policy.should_retry_error(&error, 0));
        assert!(policy.should_retry_error(&error, 1));
        assert!(!policy.should_retry_error(&error, 2));

        let parse = FetchError::ParseError("x".to_string());
        assert!(!policy.should_retry_error(&parse, 0));
    }

    #[test]
    fn test_none_never_retries() {
        let policy = RetryPolicy::none();
        assert!(!policy.should_retry_status(500, 0));
        assert!(!policy.should_retry_error(&FetchError::RequestError("x".into()), 0));
    }

    #[test]
    fn test_specific_status_condition() {
        let policy = RetryPolicy::new(1).with_conditions(vec![RetryCondition::StatusCode(429)]);
        assert!(policy.should_retry_status(429, 0));
        assert!(!policy.should_retry_status(500, 0));
    }
}
