//! Application state for Axum handlers.

use crate::signature::SignatureVerifier;
use dripsend_core::BatchScheduler;
use dripsend_core::providers::{DispatchQueue, MailSender};

/// Application state shared across all HTTP handlers.
///
/// Generic over the two provider seams so the full router can run against
/// the in-memory mocks in tests. Handlers receive it as
/// `State<Arc<AppState<M, Q>>>`.
pub struct AppState<M, Q> {
    /// Batch scheduler over the configured providers.
    pub scheduler: BatchScheduler<M, Q>,

    /// Shared site password for the cookie gate.
    pub site_password: String,

    /// Default callback base URL for remote mode, when the request does not
    /// carry one.
    pub base_url: Option<String>,

    /// Whether session cookies carry the `Secure` attribute.
    pub secure_cookies: bool,

    /// Verifier for inbound dispatcher callback signatures.
    pub verifier: SignatureVerifier,
}

impl<M, Q> AppState<M, Q>
where
    M: MailSender,
    Q: DispatchQueue,
{
    /// Create application state over the given providers.
    #[must_use]
    pub const fn new(
        mailer: M,
        queue: Q,
        site_password: String,
        base_url: Option<String>,
        secure_cookies: bool,
        verifier: SignatureVerifier,
    ) -> Self {
        Self {
            scheduler: BatchScheduler::new(mailer, queue),
            site_password,
            base_url,
            secure_cookies,
            verifier,
        }
    }
}
