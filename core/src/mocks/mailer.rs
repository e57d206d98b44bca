//! Mock mail sender for testing.

use crate::error::{Result, SendError};
use crate::message::{Attachment, EmailMessage, MailCredentials};
use crate::providers::MailSender;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Mock mail sender.
///
/// Records every delivered message in memory. Sends to recipients scripted
/// with [`failing_for`](MockMailer::failing_for) return a transport error
/// without being recorded as sent.
#[derive(Debug, Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl MockMailer {
    /// Create a mock mailer where every send succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a transport failure for the given recipient.
    #[must_use]
    pub fn failing_for(self, to: impl Into<String>) -> Self {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(to.into());
        }
        self
    }

    /// Messages recorded as sent, in delivery order.
    #[must_use]
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Number of messages recorded as sent.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or(0)
    }
}

impl MailSender for MockMailer {
    async fn send(
        &self,
        _credentials: &MailCredentials,
        message: &EmailMessage,
        _attachment: Option<&Attachment>,
    ) -> Result<()> {
        let should_fail = self
            .failing
            .lock()
            .map(|failing| failing.contains(&message.to))
            .unwrap_or(false);

        if should_fail {
            return Err(SendError::Transport(format!(
                "scripted failure for {}",
                message.to
            )));
        }

        self.sent
            .lock()
            .map_err(|_| SendError::Transport("Mutex lock failed".to_string()))?
            .push(message.clone());

        Ok(())
    }
}
