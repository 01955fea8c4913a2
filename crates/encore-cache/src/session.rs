//! Session identifiers for anonymous shoppers.

use crate::CacheError;
use serde::{Deserialize, Serialize};

/// Prefix of every generated session id.
const SESSION_PREFIX: &str = "sess_";

/// Upper bound on accepted session id length.
const MAX_SESSION_ID_LEN: usize = 128;

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session ID from a trusted string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new cryptographically secure session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("{}{}", SESSION_PREFIX, URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Parse an untrusted value, e.g. from a cookie.
    ///
    /// Only URL-safe base64 characters are accepted so the id can be used
    /// verbatim in cache keys and headers.
    pub fn parse(value: &str) -> Result<Self, CacheError> {
        let value = value.trim();
        let valid = !value.is_empty()
            && value.len() <= MAX_SESSION_ID_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CacheError::InvalidSessionId(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    /// Get the session ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
