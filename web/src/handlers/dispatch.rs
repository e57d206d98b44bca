//! Inbound dispatch endpoint.
//!
//! Invoked by the delay-queue provider when a job's delay elapses. Delivery
//! here is at-least-once: the provider may redeliver on timeout, and since
//! this endpoint holds no state, a redelivered job means a duplicate send.
//! That is a documented outcome; no deduplication is performed.

use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use dripsend_core::QueuedEmail;
use dripsend_core::providers::{DispatchQueue, MailSender};
use serde::Serialize;
use std::sync::Arc;

/// Header carrying the provider's callback signature.
pub const SIGNATURE_HEADER: &str = "upstash-signature";

/// Response reported back to the dispatcher.
///
/// A non-200 status tells the provider the delivery failed, which it may
/// use to decide on redelivery.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    /// Whether the mail send succeeded.
    pub success: bool,

    /// Recipient, once the payload parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchResponse {
    fn failure(to: Option<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            to,
            error: Some(error.into()),
        }
    }
}

/// Deliver one queued email.
///
/// # Endpoint
///
/// ```text
/// POST /api/dispatch
/// Upstash-Signature: <jwt>
///
/// {"to": "...", "subject": "...", "body": "...",
///  "accountId": "...", "secret": "...", "attachment": "..."}
/// ```
///
/// # Status codes
///
/// - 200: mail sent
/// - 400: payload missing required fields
/// - 401: signature missing or invalid (checked before anything else)
/// - 500: mail transport failure
pub async fn dispatch<M, Q>(
    State(state): State<Arc<AppState<M, Q>>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<DispatchResponse>)
where
    M: MailSender,
    Q: DispatchQueue,
{
    // Authenticity first: an unsigned call never touches the payload.
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        tracing::warn!("Dispatch callback without signature rejected");
        return (
            StatusCode::UNAUTHORIZED,
            Json(DispatchResponse::failure(None, "No signature")),
        );
    };

    if let Err(e) = state.verifier.verify(signature, body.as_bytes()) {
        tracing::warn!(error = %e, "Dispatch callback signature rejected");
        return (
            StatusCode::UNAUTHORIZED,
            Json(DispatchResponse::failure(None, "Invalid signature")),
        );
    }

    let payload: QueuedEmail = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Dispatch payload unparseable");
            return (
                StatusCode::BAD_REQUEST,
                Json(DispatchResponse::failure(None, "Missing required fields")),
            );
        }
    };

    let to = payload.to.clone();
    let (credentials, message, attachment) = match payload.into_parts() {
        Ok(parts) => parts,
        Err(e) => {
            tracing::warn!(to = %to, error = %e, "Dispatch payload invalid");
            return (
                StatusCode::BAD_REQUEST,
                Json(DispatchResponse::failure(Some(to), e.to_string())),
            );
        }
    };

    match state
        .scheduler
        .mailer()
        .send(&credentials, &message, attachment.as_ref())
        .await
    {
        Ok(()) => {
            tracing::info!(to = %to, "Queued email delivered");
            (
                StatusCode::OK,
                Json(DispatchResponse {
                    success: true,
                    to: Some(to),
                    error: None,
                }),
            )
        }
        Err(e) => {
            tracing::error!(to = %to, error = %e, "Queued email delivery failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DispatchResponse::failure(Some(to), e.to_string())),
            )
        }
    }
}
