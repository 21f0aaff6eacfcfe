//! Bearer token guard

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::warn;

use crate::error::Error;

/// Paths under this prefix always need the token
pub const API_PREFIX: &str = "/api";

/// Which paths need the token, and what the token is
#[derive(Debug)]
pub struct AuthGuard {
    token: SecretString,
    extra_paths: Vec<String>,
}

impl AuthGuard {
    pub fn new(token: SecretString) -> Self {
        AuthGuard {
            token,
            extra_paths: Vec::new(),
        }
    }

    /// Also guard an exact path outside `/api`
    pub fn protect(mut self, path: impl Into<String>) -> Self {
        self.extra_paths.push(path.into());
        self
    }

    pub fn protects(&self, path: &str) -> bool {
        let under_api = path == API_PREFIX
            || path
                .strip_prefix(API_PREFIX)
                .is_some_and(|rest| rest.starts_with('/'));

        under_api || self.extra_paths.iter().any(|p| p == path)
    }

    pub fn accepts(&self, token: &str) -> bool {
        token == self.token.expose_secret()
    }
}

/// Token from `Authorization: Bearer <token>`, if present
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

/// Reject guarded requests without the right token
pub async fn require_bearer(
    State(guard): State<Arc<AuthGuard>>,
    request: Request,
    next: Next,
) -> Response {
    if !guard.protects(request.uri().path()) {
        return next.run(request).await;
    }

    let accepted = bearer_token(request.headers()).map(|token| guard.accepts(token));

    let rejection = match accepted {
        Some(true) => return next.run(request).await,
        Some(false) => Error::Unauthorized("wrong bearer token".into()),
        None => Error::Unauthorized("missing bearer token".into()),
    };

    warn!(path = %request.uri().path(), "Rejected request: {}", rejection);
    rejection.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer test_token")), Some("test_token"));
        assert_eq!(bearer_token(&headers("bearer test_token")), Some("test_token"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("test_token")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_guarded_paths() {
        let guard = AuthGuard::new(SecretString::from("t".to_string()));
        assert!(guard.protects("/api/health"));
        assert!(guard.protects("/api/anything/else"));
        assert!(guard.protects("/api"));
        assert!(!guard.protects("/apiary"));
        assert!(!guard.protects("/ws/gateway"));

        let guard = guard.protect("/ws/gateway");
        assert!(guard.protects("/ws/gateway"));
    }

    #[test]
    fn test_accepts_exact_token_only() {
        let guard = AuthGuard::new(SecretString::from("test_token".to_string()));
        assert!(guard.accepts("test_token"));
        assert!(!guard.accepts("test_token2"));
        assert!(!guard.accepts(""));
    }
}
