//! Axum web layer for dripsend.
//!
//! The HTTP surface is thin plumbing around the scheduling core:
//!
//! 1. **HTTP request** arrives at an Axum handler
//! 2. **Extract** JSON, the session cookie, or the dispatcher signature
//! 3. **Build** domain values (`MailCredentials`, `DelayWindow`, messages)
//! 4. **Drive** the [`BatchScheduler`](dripsend_core::BatchScheduler) or the
//!    mail sender directly
//! 5. **Map** the result to an HTTP response
//!
//! # Routes
//!
//! | Route               | Guard                | Purpose                         |
//! |---------------------|----------------------|---------------------------------|
//! | `POST /api/login`   | shared password      | opens the cookie session        |
//! | `POST /api/logout`  | —                    | clears the cookie session       |
//! | `GET  /api/session` | session cookie       | session probe for the UI        |
//! | `POST /api/send`    | session cookie       | one immediate send              |
//! | `POST /api/queue`   | session cookie       | batch submission entry point    |
//! | `POST /api/dispatch`| dispatcher signature | delayed-delivery callback       |
//! | `GET  /health`      | —                    | liveness                        |

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod signature;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use router::{DISPATCH_PATH, router};
pub use signature::SignatureVerifier;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
