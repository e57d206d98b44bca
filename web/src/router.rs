//! Router assembly.

use crate::handlers::{auth, dispatch, health, queue, send};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use dripsend_core::providers::{DispatchQueue, MailSender};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Path of the inbound dispatch endpoint, shared with callback URL
/// construction.
pub const DISPATCH_PATH: &str = "/api/dispatch";

/// Build the application router.
///
/// # Examples
///
/// ```ignore
/// let state = Arc::new(AppState::new(mailer, queue, password, base_url, true, verifier));
/// let app = dripsend_web::router(state);
/// axum::serve(listener, app).await?;
/// ```
pub fn router<M, Q>(state: Arc<AppState<M, Q>>) -> Router
where
    M: MailSender + 'static,
    Q: DispatchQueue + 'static,
{
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/session", get(auth::session))
        .route("/api/send", post(send::send))
        .route("/api/queue", post(queue::queue))
        .route(DISPATCH_PATH, post(dispatch::dispatch))
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
