//! Health check endpoint.

use axum::http::StatusCode;

/// Simple liveness check.
///
/// Returns 200 OK to indicate the service is running; no dependencies are
/// checked (there are none to check — the service is stateless).
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
