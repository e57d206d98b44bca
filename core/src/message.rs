//! Domain and wire types for batch mail delivery.

use crate::error::{Result, SendError};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// One email to deliver.
///
/// Messages are immutable once read from input. A batch is an ordered
/// sequence of messages; the order defines delay accumulation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,

    /// Subject line.
    pub subject: String,

    /// Plain-text body.
    pub body: String,
}

/// Personal mail account credentials.
///
/// Passed through with each batch, never persisted server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailCredentials {
    /// Account identifier (the SMTP username, e.g. a Gmail address).
    pub account_id: String,

    /// Account secret (e.g. a Gmail app password).
    pub secret: String,
}

impl MailCredentials {
    /// Create credentials, rejecting empty fields.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::MissingCredentials`] if either field is empty.
    pub fn new(account_id: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let account_id = account_id.into();
        let secret = secret.into();

        if account_id.trim().is_empty() || secret.trim().is_empty() {
            return Err(SendError::MissingCredentials);
        }

        Ok(Self { account_id, secret })
    }
}

/// Optional PDF attachment, attached identically to every message in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Decoded file contents.
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Attachment filename presented to recipients.
    pub const FILENAME: &'static str = "CV.pdf";

    /// Attachment MIME type.
    pub const CONTENT_TYPE: &'static str = "application/pdf";

    /// Decode an attachment from its transport-safe base64 encoding.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::InvalidAttachment`] if the input is not valid
    /// base64.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| SendError::InvalidAttachment(e.to_string()))?;

        Ok(Self { bytes })
    }

    /// Re-encode the attachment for a wire payload.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

/// Wire payload carried by one dispatch-queue job.
///
/// This is the JSON body the delay-queue provider stores and later delivers
/// to the inbound dispatch endpoint. It carries everything needed to send
/// one email with no server-side state: message, credentials, and the
/// still-encoded attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedEmail {
    /// Recipient address.
    pub to: String,

    /// Subject line.
    pub subject: String,

    /// Plain-text body.
    pub body: String,

    /// Mail account identifier.
    pub account_id: String,

    /// Mail account secret.
    pub secret: String,

    /// Optional base64-encoded attachment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
}

impl QueuedEmail {
    /// Build a wire payload from domain values.
    #[must_use]
    pub fn new(
        message: &EmailMessage,
        credentials: &MailCredentials,
        attachment: Option<&Attachment>,
    ) -> Self {
        Self {
            to: message.to.clone(),
            subject: message.subject.clone(),
            body: message.body.clone(),
            account_id: credentials.account_id.clone(),
            secret: credentials.secret.clone(),
            attachment: attachment.map(Attachment::to_base64),
        }
    }

    /// Check that every required field is present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::MissingField`] naming the first empty field, or
    /// [`SendError::MissingCredentials`] when the account fields are empty.
    pub fn validate(&self) -> Result<()> {
        if self.to.trim().is_empty() {
            return Err(SendError::MissingField("to"));
        }
        if self.subject.trim().is_empty() {
            return Err(SendError::MissingField("subject"));
        }
        if self.body.trim().is_empty() {
            return Err(SendError::MissingField("body"));
        }
        if self.account_id.trim().is_empty() || self.secret.trim().is_empty() {
            return Err(SendError::MissingCredentials);
        }

        Ok(())
    }

    /// Split the payload back into domain values.
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing fields or an undecodable
    /// attachment.
    pub fn into_parts(self) -> Result<(MailCredentials, EmailMessage, Option<Attachment>)> {
        self.validate()?;

        let attachment = match &self.attachment {
            Some(encoded) => Some(Attachment::from_base64(encoded)?),
            None => None,
        };

        let credentials = MailCredentials::new(self.account_id, self.secret)?;
        let message = EmailMessage {
            to: self.to,
            subject: self.subject,
            body: self.body,
        };

        Ok((credentials, message, attachment))
    }
}

/// One unit submitted to the dispatch queue.
///
/// Carries no identity beyond the dispatcher-assigned job id returned at
/// submission time; jobs are not tracked afterwards (no cancellation, no
/// status polling).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledJob {
    /// Wire payload to deliver.
    pub email: QueuedEmail,

    /// Absolute delay from submission time, in seconds.
    pub delay_seconds: u64,

    /// Fully-qualified callback URL the provider will invoke.
    pub callback_url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to: "dev@example.com".to_string(),
            subject: "Hello".to_string(),
            body: "World".to_string(),
        }
    }

    #[test]
    fn test_credentials_reject_empty() {
        assert_eq!(
            MailCredentials::new("", "secret"),
            Err(SendError::MissingCredentials)
        );
        assert_eq!(
            MailCredentials::new("user@example.com", "  "),
            Err(SendError::MissingCredentials)
        );
        assert!(MailCredentials::new("user@example.com", "secret").is_ok());
    }

    #[test]
    fn test_attachment_base64_round_trip() {
        let attachment = Attachment::from_base64("JVBERi0xLjQ=").unwrap();
        assert_eq!(attachment.bytes, b"%PDF-1.4");
        assert_eq!(attachment.to_base64(), "JVBERi0xLjQ=");
    }

    #[test]
    fn test_attachment_rejects_bad_encoding() {
        let err = Attachment::from_base64("not base64!!").unwrap_err();
        assert!(matches!(err, SendError::InvalidAttachment(_)));
    }

    #[test]
    fn test_queued_email_wire_shape_is_camel_case() {
        let credentials = MailCredentials::new("user@example.com", "secret").unwrap();
        let payload = QueuedEmail::new(&message(), &credentials, None);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["accountId"], "user@example.com");
        assert!(json.get("attachment").is_none());
    }

    #[test]
    fn test_queued_email_validation_names_first_missing_field() {
        let payload = QueuedEmail {
            to: "dev@example.com".to_string(),
            subject: String::new(),
            body: "World".to_string(),
            account_id: "user@example.com".to_string(),
            secret: "secret".to_string(),
            attachment: None,
        };

        assert_eq!(payload.validate(), Err(SendError::MissingField("subject")));
    }

    #[test]
    fn test_queued_email_into_parts() {
        let credentials = MailCredentials::new("user@example.com", "secret").unwrap();
        let attachment = Attachment {
            bytes: b"%PDF-1.4".to_vec(),
        };
        let payload = QueuedEmail::new(&message(), &credentials, Some(&attachment));

        let (creds, msg, decoded) = payload.into_parts().unwrap();
        assert_eq!(creds, credentials);
        assert_eq!(msg, message());
        assert_eq!(decoded, Some(attachment));
    }
}
