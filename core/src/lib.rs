//! # Dripsend Core
//!
//! Batch delay scheduling and mail delivery core.
//!
//! This crate computes per-message send times from randomized delay windows
//! and drives delivery through one of two seams:
//!
//! - a [`MailSender`](providers::MailSender) for immediate, locally paced
//!   sends, and
//! - a [`DispatchQueue`](providers::DispatchQueue) for deferred sends through
//!   a hosted delayed-message queue that calls back into the application when
//!   each delay elapses.
//!
//! ## Delay model
//!
//! For a batch of N messages, message *i* (0-indexed) is sent at
//!
//! ```text
//! start_offset + Σ gap(1..=i)
//! ```
//!
//! where each gap is drawn independently and uniformly from the inclusive
//! delay window. The first message is exempt from the random gap: its delay
//! is exactly the start offset (zero by default, i.e. "send now").
//!
//! ## Example
//!
//! ```ignore
//! use dripsend_core::{BatchScheduler, DelayWindow, EmailMessage, MailCredentials};
//! use dripsend_core::providers::{QstashClient, SmtpMailer};
//!
//! let scheduler = BatchScheduler::new(mailer, queue);
//! let report = scheduler
//!     .submit_remote(&credentials, &messages, None, window, 0, &callback_url)
//!     .await;
//! println!("queued {}/{}", report.submitted, report.attempted);
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]

pub mod batch;
pub mod error;
pub mod message;
pub mod providers;
pub mod schedule;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use batch::{BatchScheduler, LocalReport, RemoteReport, SendOutcome};
pub use error::{Result, SendError};
pub use message::{Attachment, EmailMessage, MailCredentials, QueuedEmail, ScheduledJob};
pub use schedule::{DelayPlan, DelayWindow, GAP_FLOOR_SECONDS};
