//! Mock dispatch queue for testing.

use crate::error::{Result, SendError};
use crate::message::ScheduledJob;
use crate::providers::{DispatchQueue, JobId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Mock dispatch queue.
///
/// Records every accepted job in memory and hands back sequential job ids.
/// Submissions for recipients scripted with
/// [`failing_for`](MockQueue::failing_for) are rejected.
#[derive(Debug, Clone, Default)]
pub struct MockQueue {
    submitted: Arc<Mutex<Vec<ScheduledJob>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl MockQueue {
    /// Create a mock queue where every submission is accepted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a rejection for jobs addressed to the given recipient.
    #[must_use]
    pub fn failing_for(self, to: impl Into<String>) -> Self {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(to.into());
        }
        self
    }

    /// Jobs recorded as accepted, in submission order.
    #[must_use]
    pub fn submitted(&self) -> Vec<ScheduledJob> {
        self.submitted
            .lock()
            .map(|jobs| jobs.clone())
            .unwrap_or_default()
    }

    /// Absolute delays of accepted jobs, in submission order.
    #[must_use]
    pub fn submitted_delays(&self) -> Vec<u64> {
        self.submitted
            .lock()
            .map(|jobs| jobs.iter().map(|job| job.delay_seconds).collect())
            .unwrap_or_default()
    }
}

impl DispatchQueue for MockQueue {
    async fn submit(&self, job: &ScheduledJob) -> Result<JobId> {
        let should_fail = self
            .failing
            .lock()
            .map(|failing| failing.contains(&job.email.to))
            .unwrap_or(false);

        if should_fail {
            return Err(SendError::Dispatch(format!(
                "scripted rejection for {}",
                job.email.to
            )));
        }

        let mut submitted = self
            .submitted
            .lock()
            .map_err(|_| SendError::Dispatch("Mutex lock failed".to_string()))?;
        submitted.push(job.clone());

        Ok(JobId(format!("mock-{}", submitted.len())))
    }
}
