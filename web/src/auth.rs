//! Cookie-based session gate.
//!
//! A single shared password opens a session; the session is an HttpOnly
//! cookie with a fixed value, checked by the [`AuthSession`] extractor on
//! every gated route. This is a minimal capability check, not an auth
//! subsystem.

use crate::error::AppError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "dripsend_session";

/// Fixed value marking an open session.
const SESSION_VALUE: &str = "authenticated";

/// Session lifetime.
fn session_max_age() -> chrono::Duration {
    chrono::Duration::hours(24)
}

/// Build the `Set-Cookie` header value that opens a session.
///
/// HttpOnly and SameSite=Lax always; `Secure` when the deployment serves
/// HTTPS.
#[must_use]
pub fn session_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={SESSION_VALUE}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        session_max_age().num_seconds()
    );
    if secure {
        cookie.push_str("; Secure");
    }

    cookie
}

/// Build the `Set-Cookie` header value that closes a session.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }

    cookie
}

/// Whether the request's `Cookie` header carries an open session.
fn has_session(parts: &Parts) -> bool {
    let Some(cookies) = parts
        .headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    cookies.split(';').any(|pair| {
        let mut parts = pair.trim().splitn(2, '=');
        parts.next() == Some(SESSION_COOKIE) && parts.next() == Some(SESSION_VALUE)
    })
}

/// Extractor guarding authenticated routes.
///
/// Rejects with 401 when the session cookie is missing or does not carry
/// the expected value.
///
/// # Examples
///
/// ```ignore
/// async fn handler(_session: AuthSession) -> Json<Response> {
///     // only reachable with an open session
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthSession;

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if has_session(parts) {
            Ok(Self)
        } else {
            Err(AppError::unauthorized("Not authenticated"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(true);
        assert!(cookie.starts_with("dripsend_session=authenticated"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(cookie.ends_with("Secure"));

        let insecure = session_cookie(false);
        assert!(!insecure.contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        assert!(clear_session_cookie(false).contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_extractor_accepts_open_session() {
        let req = Request::builder()
            .header(header::COOKIE, "other=1; dripsend_session=authenticated")
            .body(())
            .unwrap();
        let (mut parts, ()) = req.into_parts();

        assert!(
            AuthSession::from_request_parts(&mut parts, &())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_extractor_rejects_missing_cookie() {
        let req = Request::builder().body(()).unwrap();
        let (mut parts, ()) = req.into_parts();

        assert!(
            AuthSession::from_request_parts(&mut parts, &())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_extractor_rejects_wrong_value() {
        let req = Request::builder()
            .header(header::COOKIE, "dripsend_session=forged")
            .body(())
            .unwrap();
        let (mut parts, ()) = req.into_parts();

        assert!(
            AuthSession::from_request_parts(&mut parts, &())
                .await
                .is_err()
        );
    }
}
