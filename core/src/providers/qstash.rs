//! Dispatch queue client for a QStash-style delayed-delivery service.

use crate::error::{Result, SendError};
use crate::message::ScheduledJob;
use crate::providers::{DispatchQueue, JobId};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// Response body from a successful publish call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    message_id: String,
}

/// Client for a hosted delayed-message queue.
///
/// Each submission publishes one JSON payload with an absolute delay; the
/// service later POSTs the payload to the job's callback URL. Delivery
/// mechanics (retries, at-least-once redelivery) are the provider's concern.
///
/// # Examples
///
/// ```
/// use dripsend_core::providers::QstashClient;
///
/// let queue = QstashClient::new(
///     "https://qstash.upstash.io".to_string(),
///     "qstash-token".to_string(),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct QstashClient {
    client: Client,
    api_url: String,
    token: String,
}

impl QstashClient {
    /// Create a new dispatch queue client.
    #[must_use]
    pub fn new(api_url: String, token: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            token,
        }
    }

    /// Create a client reading `QSTASH_URL` and `QSTASH_TOKEN` from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::MissingCredentials`] if `QSTASH_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("QSTASH_URL")
            .unwrap_or_else(|_| "https://qstash.upstash.io".to_string());
        let token = std::env::var("QSTASH_TOKEN").map_err(|_| SendError::MissingCredentials)?;

        Ok(Self::new(api_url, token))
    }

    /// Publish URL for one job: `{api}/v2/publish/{callback}`.
    fn publish_url(&self, job: &ScheduledJob) -> String {
        format!(
            "{}/v2/publish/{}",
            self.api_url.trim_end_matches('/'),
            job.callback_url
        )
    }
}

impl DispatchQueue for QstashClient {
    async fn submit(&self, job: &ScheduledJob) -> Result<JobId> {
        tracing::debug!(
            to = %job.email.to,
            delay_seconds = job.delay_seconds,
            callback = %job.callback_url,
            "Submitting scheduled job"
        );

        let response = self
            .client
            .post(self.publish_url(job))
            .bearer_auth(&self.token)
            .header("Upstash-Delay", format!("{}s", job.delay_seconds))
            .json(&job.email)
            .send()
            .await
            .map_err(|e| SendError::Dispatch(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let body: PublishResponse = response
                    .json()
                    .await
                    .map_err(|e| SendError::Dispatch(format!("Malformed response: {e}")))?;

                Ok(JobId(body.message_id))
            }
            StatusCode::UNAUTHORIZED => {
                Err(SendError::Dispatch("Queue token rejected".to_string()))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SendError::Dispatch(format!("{status}: {body}")))
            }
        }
    }
}
