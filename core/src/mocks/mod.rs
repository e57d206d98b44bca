//! Mock providers for testing.
//!
//! In-memory stand-ins for the delivery seams: they record every call and
//! can be scripted to fail for chosen recipients.

mod mailer;
mod queue;

pub use mailer::MockMailer;
pub use queue::MockQueue;
