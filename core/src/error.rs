//! Error types for batch scheduling and delivery operations.

use thiserror::Error;

/// Result type alias for scheduling and delivery operations.
pub type Result<T> = std::result::Result<T, SendError>;

/// Error taxonomy for the scheduling and delivery core.
///
/// Variants are organized by category: authentication failures are surfaced
/// to the caller with no retry, validation failures abort the batch before it
/// starts, transport failures are recorded per message while the batch
/// continues, and configuration failures abort the whole batch before any
/// submission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendError {
    // ═══════════════════════════════════════════════════════════
    // Authentication Errors
    // ═══════════════════════════════════════════════════════════

    /// Shared site password did not match.
    #[error("Invalid password")]
    InvalidPassword,

    /// Request is missing a valid session.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Dispatcher callback carried no signature header.
    #[error("No dispatcher signature provided")]
    MissingSignature,

    /// Dispatcher callback signature did not verify.
    #[error("Invalid dispatcher signature: {0}")]
    InvalidSignature(String),

    // ═══════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════

    /// Delay window is malformed (min below the floor, or min > max).
    #[error("Invalid delay window: min {min}s, max {max}s")]
    InvalidDelayWindow {
        /// Requested minimum gap in seconds.
        min: u64,
        /// Requested maximum gap in seconds.
        max: u64,
    },

    /// Mail account credentials are missing or empty.
    #[error("Missing mail credentials")]
    MissingCredentials,

    /// A message is missing a required field.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Attachment payload could not be decoded from base64.
    #[error("Invalid attachment encoding: {0}")]
    InvalidAttachment(String),

    // ═══════════════════════════════════════════════════════════
    // Transport Errors
    // ═══════════════════════════════════════════════════════════

    /// An individual mail send failed.
    #[error("Mail transport error: {0}")]
    Transport(String),

    /// A dispatch-queue submission was rejected.
    #[error("Dispatch submission failed: {0}")]
    Dispatch(String),

    // ═══════════════════════════════════════════════════════════
    // Configuration Errors
    // ═══════════════════════════════════════════════════════════

    /// No callback base URL could be resolved for remote mode.
    #[error("No callback base URL configured")]
    MissingBaseUrl,
}

impl SendError {
    /// Returns `true` if this error is due to invalid caller input.
    ///
    /// Validation errors mean the batch was never started.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dripsend_core::SendError;
    /// assert!(SendError::MissingCredentials.is_validation());
    /// assert!(!SendError::Transport("boom".into()).is_validation());
    /// ```
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDelayWindow { .. }
                | Self::MissingCredentials
                | Self::MissingField(_)
                | Self::InvalidAttachment(_)
        )
    }

    /// Returns `true` if this error is an authentication failure.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dripsend_core::SendError;
    /// assert!(SendError::MissingSignature.is_auth());
    /// assert!(!SendError::MissingBaseUrl.is_auth());
    /// ```
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::InvalidPassword
                | Self::NotAuthenticated
                | Self::MissingSignature
                | Self::InvalidSignature(_)
        )
    }
}
