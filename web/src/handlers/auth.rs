//! Login, logout, and session probe handlers.

use crate::auth::{AuthSession, clear_session_cookie, session_cookie};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::header::SET_COOKIE,
    response::AppendHeaders,
};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Login request.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Shared site password.
    pub password: String,
}

/// Login/logout response.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Whether the session state changed as requested.
    pub success: bool,
}

/// Session probe response.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    /// Always true; unauthenticated probes get a 401 instead.
    pub authenticated: bool,
}

/// Open a session.
///
/// # Endpoint
///
/// ```text
/// POST /api/login
/// Content-Type: application/json
///
/// {"password": "..."}
/// ```
///
/// The password is compared in constant time. Success sets the session
/// cookie; failure is a 401 with no cookie.
pub async fn login<M, Q>(
    State(state): State<Arc<AppState<M, Q>>>,
    Json(request): Json<LoginRequest>,
) -> Result<(AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<LoginResponse>), AppError>
where
    M: Send + Sync,
    Q: Send + Sync,
{
    if !constant_time_eq(
        request.password.as_bytes(),
        state.site_password.as_bytes(),
    ) {
        tracing::warn!("Login attempt with wrong password");
        return Err(AppError::unauthorized("Invalid password"));
    }

    tracing::info!("Session opened");

    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(state.secure_cookies))]),
        Json(LoginResponse { success: true }),
    ))
}

/// Close the session.
///
/// # Endpoint
///
/// ```text
/// POST /api/logout
/// ```
pub async fn logout<M, Q>(
    State(state): State<Arc<AppState<M, Q>>>,
) -> (AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<LoginResponse>)
where
    M: Send + Sync,
    Q: Send + Sync,
{
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie(state.secure_cookies))]),
        Json(LoginResponse { success: true }),
    )
}

/// Session probe for the UI.
///
/// # Endpoint
///
/// ```text
/// GET /api/session
/// ```
///
/// 200 when the session cookie is valid, 401 otherwise (via the extractor).
#[allow(clippy::unused_async)]
pub async fn session(_session: AuthSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: true,
    })
}
