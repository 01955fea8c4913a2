//! Cart session cookie.

use crate::ApiRequest;
use encore_cache::SessionId;

/// Cookie holding the cart session id.
pub const SESSION_COOKIE: &str = "encore_session";

/// The session a cart request belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    /// Created for this request; the cookie must be set on the response.
    pub fresh: bool,
}

impl Session {
    /// Read the session cookie, or start a new session.
    ///
    /// A cookie that isn't a valid session id is replaced.
    pub fn from_request(request: &ApiRequest) -> Self {
        match request.cookie(SESSION_COOKIE).map(SessionId::parse) {
            Some(Ok(id)) => Self { id, fresh: false },
            Some(Err(e)) => {
                tracing::debug!(error = %e, "replacing invalid session cookie");
                Self::start()
            }
            None => Self::start(),
        }
    }

    fn start() -> Self {
        Self {
            id: SessionId::generate(),
            fresh: true,
        }
    }

    /// `Set-Cookie` value for this session.
    pub fn cookie(&self) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            self.id.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_existing_session() {
        let req = ApiRequest::new(Method::GET, "/api/cart")
            .with_header("cookie", "encore_session=sess_abc123");
        let session = Session::from_request(&req);
        assert_eq!(session.id.as_str(), "sess_abc123");
        assert!(!session.fresh);
    }

    #[test]
    fn test_new_session() {
        let session = Session::from_request(&ApiRequest::new(Method::GET, "/api/cart"));
        assert!(session.fresh);
        assert!(session.id.as_str().starts_with("sess_"));
        assert_eq!(
            session.cookie(),
            format!(
                "encore_session={}; Path=/; HttpOnly; SameSite=Lax",
                session.id.as_str()
            )
        );
    }

    #[test]
    fn test_invalid_cookie_replaced() {
        let req = ApiRequest::new(Method::GET, "/api/cart")
            .with_header("cookie", "encore_session=../../etc");
        let session = Session::from_request(&req);
        assert!(session.fresh);
        assert_ne!(session.id.as_str(), "../../etc");
    }
}
