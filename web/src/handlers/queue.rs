//! Batch submission entry point (remote mode).

use crate::auth::AuthSession;
use crate::error::AppError;
use crate::middleware::CorrelationId;
use crate::router::DISPATCH_PATH;
use crate::state::AppState;
use axum::{Json, extract::State};
use dripsend_core::providers::{DispatchQueue, MailSender};
use dripsend_core::{Attachment, DelayWindow, EmailMessage, MailCredentials, SendError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Batch submission request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRequest {
    /// Mail account identifier.
    pub account_id: String,

    /// Mail account secret.
    pub secret: String,

    /// Ordered batch; order defines delay accumulation.
    pub messages: Vec<EmailMessage>,

    /// Minimum inter-message gap in seconds.
    pub min_delay_seconds: u64,

    /// Maximum inter-message gap in seconds.
    pub max_delay_seconds: u64,

    /// Delay before the first message, for "start at future time T".
    #[serde(default)]
    pub start_offset_seconds: u64,

    /// Optional base64-encoded PDF attachment, shared by every message.
    #[serde(default)]
    pub attachment: Option<String>,

    /// Callback base URL override; falls back to server configuration.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Batch submission response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueResponse {
    /// Whether every submission was accepted.
    pub success: bool,

    /// Number of jobs the queue accepted.
    pub total_queued: usize,

    /// First submission error, when any job was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build the fully-qualified callback URL for the dispatch endpoint.
///
/// Prepends `https://` when the configured base lacks a scheme, so a bare
/// deployment hostname works as-is.
fn resolve_callback_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');

    if base.starts_with("http://") || base.starts_with("https://") {
        format!("{base}{DISPATCH_PATH}")
    } else {
        format!("https://{base}{DISPATCH_PATH}")
    }
}

/// Queue a whole batch on the dispatch queue.
///
/// # Endpoint
///
/// ```text
/// POST /api/queue
/// Content-Type: application/json
///
/// {
///   "accountId": "user@gmail.com",
///   "secret": "app-password",
///   "messages": [{"to": "...", "subject": "...", "body": "..."}],
///   "minDelaySeconds": 120,
///   "maxDelaySeconds": 300,
///   "startOffsetSeconds": 0,
///   "attachment": "JVBERi0...",
///   "baseUrl": "app.example.com"
/// }
/// ```
///
/// Validation failures (bad window, missing credentials, bad attachment) are
/// a 422 before anything is submitted; an empty batch is an immediate
/// success; a missing callback base URL is a 503. Otherwise every job is
/// submitted even if some are rejected, and the response reports the
/// accepted count plus the first rejection.
pub async fn queue<M, Q>(
    _session: AuthSession,
    State(state): State<Arc<AppState<M, Q>>>,
    correlation_id: CorrelationId,
    Json(request): Json<QueueRequest>,
) -> Result<Json<QueueResponse>, AppError>
where
    M: MailSender,
    Q: DispatchQueue,
{
    let credentials = MailCredentials::new(request.account_id, request.secret)?;
    let window = DelayWindow::new(request.min_delay_seconds, request.max_delay_seconds)?;
    let attachment = request
        .attachment
        .as_deref()
        .map(Attachment::from_base64)
        .transpose()?;

    if request.messages.is_empty() {
        return Ok(Json(QueueResponse {
            success: true,
            total_queued: 0,
            error: None,
        }));
    }

    let base_url = request
        .base_url
        .as_deref()
        .or(state.base_url.as_deref())
        .filter(|base| !base.trim().is_empty())
        .ok_or(SendError::MissingBaseUrl)?;
    let callback_url = resolve_callback_url(base_url);

    tracing::info!(
        correlation_id = %correlation_id.0,
        batch_size = request.messages.len(),
        min_delay_seconds = request.min_delay_seconds,
        max_delay_seconds = request.max_delay_seconds,
        start_offset_seconds = request.start_offset_seconds,
        "Batch queue requested"
    );

    let report = state
        .scheduler
        .submit_remote(
            &credentials,
            &request.messages,
            attachment.as_ref(),
            window,
            request.start_offset_seconds,
            &callback_url,
        )
        .await;

    Ok(Json(QueueResponse {
        success: report.first_error.is_none(),
        total_queued: report.submitted,
        error: report.first_error.map(|e| e.to_string()),
    }))
}
