//! Single immediate send.
//!
//! The browser-paced local mode drives this endpoint once per message,
//! sleeping between calls; the server does one synchronous send and reports
//! the outcome in the body so the client loop can continue past failures.

use crate::auth::AuthSession;
use crate::error::AppError;
use crate::middleware::CorrelationId;
use crate::state::AppState;
use axum::{Json, extract::State};
use dripsend_core::providers::{DispatchQueue, MailSender};
use dripsend_core::{Attachment, EmailMessage, MailCredentials};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request for one immediate send.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    /// Mail account identifier.
    pub account_id: String,

    /// Mail account secret.
    pub secret: String,

    /// Message to deliver.
    pub message: EmailMessage,

    /// Optional base64-encoded PDF attachment.
    #[serde(default)]
    pub attachment: Option<String>,
}

/// Outcome of one immediate send.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    /// Whether the transport accepted the message.
    pub success: bool,

    /// Recipient address.
    pub to: String,

    /// Transport error message, when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Send one email immediately.
///
/// # Endpoint
///
/// ```text
/// POST /api/send
/// Content-Type: application/json
///
/// {
///   "accountId": "user@gmail.com",
///   "secret": "app-password",
///   "message": {"to": "...", "subject": "...", "body": "..."},
///   "attachment": "JVBERi0..."
/// }
/// ```
///
/// Validation failures are a 422; a transport failure is a 200 with
/// `success: false`, so a client pacing a batch can record it and move on.
pub async fn send<M, Q>(
    _session: AuthSession,
    State(state): State<Arc<AppState<M, Q>>>,
    correlation_id: CorrelationId,
    Json(request): Json<SendRequest>,
) -> Result<Json<SendResponse>, AppError>
where
    M: MailSender,
    Q: DispatchQueue,
{
    let credentials = MailCredentials::new(request.account_id, request.secret)?;
    let attachment = request
        .attachment
        .as_deref()
        .map(Attachment::from_base64)
        .transpose()?;

    let to = request.message.to.clone();
    tracing::info!(correlation_id = %correlation_id.0, to = %to, "Immediate send requested");

    let response = match state
        .scheduler
        .mailer()
        .send(&credentials, &request.message, attachment.as_ref())
        .await
    {
        Ok(()) => SendResponse {
            success: true,
            to,
            error: None,
        },
        Err(e) => SendResponse {
            success: false,
            to,
            error: Some(e.to_string()),
        },
    };

    Ok(Json(response))
}
