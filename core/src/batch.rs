//! Batch scheduler: drives a delay plan through one of the delivery seams.
//!
//! Both modes share the same plan computation; only the execution target
//! differs. Local mode sends sequentially through a [`MailSender`] with
//! real-time pauses between messages. Remote mode submits every message to a
//! [`DispatchQueue`] up front with precomputed absolute delays and returns
//! immediately.

use crate::error::SendError;
use crate::message::{Attachment, EmailMessage, MailCredentials, QueuedEmail, ScheduledJob};
use crate::providers::{DispatchQueue, MailSender};
use crate::schedule::{DelayPlan, DelayWindow};
use std::time::Duration;
use tokio::sync::mpsc;

pub use tokio_util::sync::CancellationToken;

/// Per-message result of a local-mode send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// Recipient address.
    pub to: String,

    /// Whether the transport accepted the message.
    pub success: bool,

    /// Transport error message, when `success` is false.
    pub error: Option<String>,
}

/// Result of a local-mode batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalReport {
    /// One outcome per message actually attempted, in batch order.
    pub outcomes: Vec<SendOutcome>,

    /// Whether the run was halted by cancellation before completing.
    pub cancelled: bool,
}

/// Result of a remote-mode batch submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReport {
    /// Number of submissions attempted (always the full batch size).
    pub attempted: usize,

    /// Number of submissions the queue accepted.
    pub submitted: usize,

    /// First submission error, if any job was rejected.
    pub first_error: Option<SendError>,
}

/// Drives batch delivery through the configured providers.
///
/// Holds no per-batch state; credentials and attachment are read-only for
/// the duration of one call.
#[derive(Debug, Clone)]
pub struct BatchScheduler<M, Q> {
    mailer: M,
    queue: Q,
}

impl<M, Q> BatchScheduler<M, Q>
where
    M: MailSender,
    Q: DispatchQueue,
{
    /// Create a scheduler over the given providers.
    #[must_use]
    pub const fn new(mailer: M, queue: Q) -> Self {
        Self { mailer, queue }
    }

    /// Direct access to the mail sender, for single immediate sends.
    #[must_use]
    pub const fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Run a batch in local mode: wait, send, repeat.
    ///
    /// Message *i* is sent after `plan[i] - plan[i-1]` seconds of real time
    /// (the start offset for the first message). A failed send is recorded
    /// and the batch continues. The cancellation token is checked before
    /// each wait and before each send and also interrupts a wait in
    /// progress; a send already in flight is never aborted.
    ///
    /// Each outcome is pushed to `progress` as it completes so callers can
    /// observe the batch incrementally; a dropped receiver is ignored.
    pub async fn run_local(
        &self,
        credentials: &MailCredentials,
        messages: &[EmailMessage],
        attachment: Option<&Attachment>,
        window: DelayWindow,
        start_offset_seconds: u64,
        cancel: &CancellationToken,
        progress: Option<mpsc::UnboundedSender<SendOutcome>>,
    ) -> LocalReport {
        let plan = {
            let mut rng = rand::thread_rng();
            DelayPlan::generate(messages.len(), window, start_offset_seconds, &mut rng)
        };

        let mut outcomes = Vec::with_capacity(messages.len());
        let mut previous = 0_u64;

        for (message, (_, cumulative)) in messages.iter().zip(plan.iter()) {
            let wait = cumulative - previous;
            previous = cumulative;

            if wait > 0 {
                tracing::debug!(to = %message.to, wait_seconds = wait, "Waiting before send");
                tokio::select! {
                    () = cancel.cancelled() => {
                        return LocalReport { outcomes, cancelled: true };
                    }
                    () = tokio::time::sleep(Duration::from_secs(wait)) => {}
                }
            }

            if cancel.is_cancelled() {
                return LocalReport { outcomes, cancelled: true };
            }

            let outcome = match self.mailer.send(credentials, message, attachment).await {
                Ok(()) => {
                    tracing::info!(to = %message.to, "Email sent");
                    SendOutcome {
                        to: message.to.clone(),
                        success: true,
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::warn!(to = %message.to, error = %e, "Email send failed");
                    SendOutcome {
                        to: message.to.clone(),
                        success: false,
                        error: Some(e.to_string()),
                    }
                }
            };

            if let Some(tx) = &progress {
                let _ = tx.send(outcome.clone());
            }
            outcomes.push(outcome);
        }

        LocalReport {
            outcomes,
            cancelled: false,
        }
    }

    /// Run a batch in remote mode: submit every job up front.
    ///
    /// The full delay plan is computed before any submission. Jobs are
    /// submitted in order without waiting between them; a rejected
    /// submission is recorded and the remaining jobs are still attempted.
    pub async fn submit_remote(
        &self,
        credentials: &MailCredentials,
        messages: &[EmailMessage],
        attachment: Option<&Attachment>,
        window: DelayWindow,
        start_offset_seconds: u64,
        callback_url: &str,
    ) -> RemoteReport {
        let plan = {
            let mut rng = rand::thread_rng();
            DelayPlan::generate(messages.len(), window, start_offset_seconds, &mut rng)
        };

        tracing::info!(
            batch_size = messages.len(),
            start_offset_seconds,
            callback = %callback_url,
            "Submitting batch to dispatch queue"
        );

        let mut submitted = 0_usize;
        let mut first_error = None;

        for (message, (index, delay_seconds)) in messages.iter().zip(plan.iter()) {
            let job = ScheduledJob {
                email: QueuedEmail::new(message, credentials, attachment),
                delay_seconds,
                callback_url: callback_url.to_string(),
            };

            match self.queue.submit(&job).await {
                Ok(job_id) => {
                    tracing::info!(
                        to = %message.to,
                        delay_seconds,
                        %job_id,
                        "Job accepted"
                    );
                    submitted += 1;
                }
                Err(e) => {
                    tracing::warn!(to = %message.to, index, error = %e, "Job rejected");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        RemoteReport {
            attempted: messages.len(),
            submitted,
            first_error,
        }
    }
}
