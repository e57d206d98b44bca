//! Provider traits for the two delivery seams.
//!
//! The scheduler core never talks to SMTP or to the delay-queue service
//! directly; it goes through these traits so tests can run against the
//! in-memory mocks and applications can swap transports.

mod qstash;
mod smtp;

pub use qstash::QstashClient;
pub use smtp::SmtpMailer;

use crate::error::Result;
use crate::message::{Attachment, EmailMessage, MailCredentials, ScheduledJob};
use std::future::Future;

/// Opaque job identifier assigned by the dispatch queue at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobId(pub String);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mail sender.
///
/// Delivers one email synchronously from the caller's point of view and
/// reports success or a transport error. No retry, no batching.
pub trait MailSender: Send + Sync {
    /// Send one email through the given account.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SendError::Transport`] if the message cannot be
    /// built or the transport rejects it.
    fn send(
        &self,
        credentials: &MailCredentials,
        message: &EmailMessage,
        attachment: Option<&Attachment>,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Scheduled dispatch queue client.
///
/// Submits one job to a third-party delayed-delivery service. The provider
/// guarantees it will invoke the job's callback URL at-or-after the delay
/// elapses; delivery itself is out of band and may be retried by the
/// provider.
pub trait DispatchQueue: Send + Sync {
    /// Submit one scheduled job.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SendError::Dispatch`] if the service rejects the
    /// submission or cannot be reached.
    fn submit(&self, job: &ScheduledJob) -> impl Future<Output = Result<JobId>> + Send;
}
