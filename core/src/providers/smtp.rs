//! SMTP mail sender implementation using Lettre.

use crate::error::{Result, SendError};
use crate::message::{Attachment, EmailMessage, MailCredentials};
use crate::providers::MailSender;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as FilePart, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// SMTP mail sender using Lettre.
///
/// Holds only the relay coordinates; account credentials arrive with each
/// send, because every batch may use a different personal account. A fresh
/// transport is built per send to avoid connection pooling issues with
/// rotating credentials.
///
/// # Examples
///
/// ```
/// use dripsend_core::providers::SmtpMailer;
///
/// let mailer = SmtpMailer::new("smtp.gmail.com".to_string(), 587);
/// ```
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    /// SMTP relay address (e.g. "smtp.gmail.com").
    relay: String,

    /// SMTP relay port (587 for STARTTLS).
    port: u16,
}

impl SmtpMailer {
    /// Create a new SMTP mail sender.
    #[must_use]
    pub const fn new(relay: String, port: u16) -> Self {
        Self { relay, port }
    }

    /// Build an SMTP transport authenticated as the given account.
    fn build_transport(&self, credentials: &MailCredentials) -> Result<SmtpTransport> {
        let transport = SmtpTransport::relay(&self.relay)
            .map_err(|e| SendError::Transport(format!("SMTP relay error: {e}")))?
            .port(self.port)
            .credentials(Credentials::new(
                credentials.account_id.clone(),
                credentials.secret.clone(),
            ))
            .build();

        Ok(transport)
    }

    /// Assemble the MIME message.
    ///
    /// The plain-text body is paired with an HTML rendering (newlines become
    /// `<br>`), and the optional PDF rides along as a mixed part.
    fn build_message(
        credentials: &MailCredentials,
        message: &EmailMessage,
        attachment: Option<&Attachment>,
    ) -> Result<Message> {
        let html_body = message.body.replace('\n', "<br>");
        let alternative = MultiPart::alternative_plain_html(message.body.clone(), html_body);

        let builder = Message::builder()
            .from(
                credentials
                    .account_id
                    .parse()
                    .map_err(|e| SendError::Transport(format!("Invalid from address: {e}")))?,
            )
            .to(message
                .to
                .parse()
                .map_err(|e| SendError::Transport(format!("Invalid to address: {e}")))?)
            .subject(&message.subject);

        let body = match attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(Attachment::CONTENT_TYPE)
                    .map_err(|e| SendError::Transport(format!("Invalid content type: {e}")))?;
                let part = FilePart::new(Attachment::FILENAME.to_string())
                    .body(attachment.bytes.clone(), content_type);

                MultiPart::mixed().multipart(alternative).singlepart(part)
            }
            None => alternative,
        };

        builder
            .multipart(body)
            .map_err(|e| SendError::Transport(format!("Failed to build email: {e}")))
    }
}

impl MailSender for SmtpMailer {
    async fn send(
        &self,
        credentials: &MailCredentials,
        message: &EmailMessage,
        attachment: Option<&Attachment>,
    ) -> Result<()> {
        let email = Self::build_message(credentials, message, attachment)?;
        let mailer = self.build_transport(credentials)?;

        tracing::debug!(to = %message.to, relay = %self.relay, "Sending email");

        // Lettre's sync transport blocks; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            mailer
                .send(&email)
                .map_err(|e| SendError::Transport(format!("Failed to send email: {e}")))
        })
        .await
        .map_err(|e| SendError::Transport(format!("Send task failed: {e}")))?
        .map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn credentials() -> MailCredentials {
        MailCredentials::new("sender@example.com", "app-password").unwrap()
    }

    fn message() -> EmailMessage {
        EmailMessage {
            to: "dev@example.com".to_string(),
            subject: "Hello".to_string(),
            body: "line one\nline two".to_string(),
        }
    }

    #[test]
    fn test_build_message_plain() {
        let email = SmtpMailer::build_message(&credentials(), &message(), None).unwrap();
        let rendered = String::from_utf8(email.formatted()).unwrap();

        assert!(rendered.contains("Subject: Hello"));
        assert!(rendered.contains("line one<br>line two"));
    }

    #[test]
    fn test_build_message_with_attachment() {
        let attachment = Attachment {
            bytes: b"%PDF-1.4".to_vec(),
        };
        let email =
            SmtpMailer::build_message(&credentials(), &message(), Some(&attachment)).unwrap();
        let rendered = String::from_utf8(email.formatted()).unwrap();

        assert!(rendered.contains("CV.pdf"));
        assert!(rendered.contains("application/pdf"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let mut bad = message();
        bad.to = "not an address".to_string();

        let err = SmtpMailer::build_message(&credentials(), &bad, None).unwrap_err();
        assert!(matches!(err, SendError::Transport(_)));
    }
}
