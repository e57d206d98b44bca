//! Integration tests for the batch scheduler's two execution modes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use dripsend_core::mocks::{MockMailer, MockQueue};
use dripsend_core::{
    BatchScheduler, DelayWindow, EmailMessage, MailCredentials, SendError,
    batch::CancellationToken,
};
use tokio::sync::mpsc;

fn credentials() -> MailCredentials {
    MailCredentials::new("sender@example.com", "app-password").unwrap()
}

fn batch(recipients: &[&str]) -> Vec<EmailMessage> {
    recipients
        .iter()
        .map(|to| EmailMessage {
            to: (*to).to_string(),
            subject: "Subject".to_string(),
            body: "Body".to_string(),
        })
        .collect()
}

fn scheduler(mailer: &MockMailer, queue: &MockQueue) -> BatchScheduler<MockMailer, MockQueue> {
    BatchScheduler::new(mailer.clone(), queue.clone())
}

#[tokio::test(start_paused = true)]
async fn local_mode_sends_sequentially_in_order() {
    let mailer = MockMailer::new();
    let queue = MockQueue::new();
    let messages = batch(&["a@example.com", "b@example.com", "c@example.com"]);
    let window = DelayWindow::new(5, 5).unwrap();

    let report = scheduler(&mailer, &queue)
        .run_local(
            &credentials(),
            &messages,
            None,
            window,
            0,
            &CancellationToken::new(),
            None,
        )
        .await;

    assert!(!report.cancelled);
    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes.iter().all(|o| o.success));

    let sent: Vec<String> = mailer.sent().into_iter().map(|m| m.to).collect();
    assert_eq!(sent, ["a@example.com", "b@example.com", "c@example.com"]);
}

#[tokio::test(start_paused = true)]
async fn local_mode_continues_after_transport_failure() {
    let mailer = MockMailer::new().failing_for("b@example.com");
    let queue = MockQueue::new();
    let messages = batch(&["a@example.com", "b@example.com", "c@example.com"]);
    let window = DelayWindow::new(1, 1).unwrap();

    let report = scheduler(&mailer, &queue)
        .run_local(
            &credentials(),
            &messages,
            None,
            window,
            0,
            &CancellationToken::new(),
            None,
        )
        .await;

    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes[0].success);
    assert!(!report.outcomes[1].success);
    assert!(report.outcomes[1].error.is_some());
    assert!(report.outcomes[2].success);
    assert_eq!(mailer.sent_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn local_mode_cancel_between_messages_stops_batch() {
    let mailer = MockMailer::new();
    let queue = MockQueue::new();
    let messages = batch(&["a@example.com", "b@example.com", "c@example.com"]);
    let window = DelayWindow::new(60, 60).unwrap();
    let cancel = CancellationToken::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let task = {
        let scheduler = scheduler(&mailer, &queue);
        let credentials = credentials();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            scheduler
                .run_local(&credentials, &messages, None, window, 0, &cancel, Some(tx))
                .await
        })
    };

    // First outcome arrives immediately (zero start offset), then the
    // scheduler waits 60s before message two. Cancel during that wait.
    let first = rx.recv().await.unwrap();
    assert_eq!(first.to, "a@example.com");
    cancel.cancel();

    let report = task.await.unwrap();
    assert!(report.cancelled);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(mailer.sent_count(), 1);
    assert!(rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn local_mode_waits_start_offset_before_first_send() {
    let mailer = MockMailer::new();
    let queue = MockQueue::new();
    let messages = batch(&["a@example.com"]);
    let window = DelayWindow::new(1, 1).unwrap();

    let started = tokio::time::Instant::now();
    let report = scheduler(&mailer, &queue)
        .run_local(
            &credentials(),
            &messages,
            None,
            window,
            300,
            &CancellationToken::new(),
            None,
        )
        .await;

    assert_eq!(started.elapsed().as_secs(), 300);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(mailer.sent_count(), 1);
}

#[tokio::test]
async fn remote_mode_submits_all_with_cumulative_delays() {
    let mailer = MockMailer::new();
    let queue = MockQueue::new();
    let messages = batch(&["a@example.com", "b@example.com", "c@example.com"]);
    let window = DelayWindow::new(10, 10).unwrap();

    let report = scheduler(&mailer, &queue)
        .submit_remote(
            &credentials(),
            &messages,
            None,
            window,
            0,
            "https://app.example.com/api/dispatch",
        )
        .await;

    assert_eq!(report.attempted, 3);
    assert_eq!(report.submitted, 3);
    assert!(report.first_error.is_none());
    assert_eq!(queue.submitted_delays(), [0, 10, 20]);

    let jobs = queue.submitted();
    assert!(jobs.iter().all(|job| {
        job.callback_url == "https://app.example.com/api/dispatch"
            && job.email.account_id == "sender@example.com"
    }));
}

#[tokio::test]
async fn remote_mode_rejection_does_not_stop_later_submissions() {
    let mailer = MockMailer::new();
    let queue = MockQueue::new().failing_for("b@example.com");
    let messages = batch(&["a@example.com", "b@example.com", "c@example.com"]);
    let window = DelayWindow::new(10, 10).unwrap();

    let report = scheduler(&mailer, &queue)
        .submit_remote(
            &credentials(),
            &messages,
            None,
            window,
            0,
            "https://app.example.com/api/dispatch",
        )
        .await;

    assert_eq!(report.attempted, 3);
    assert_eq!(report.submitted, 2);
    assert!(matches!(report.first_error, Some(SendError::Dispatch(_))));

    // Message three was still attempted with its planned cumulative delay.
    assert_eq!(queue.submitted_delays(), [0, 20]);
}

#[tokio::test]
async fn remote_mode_empty_batch_is_a_no_op() {
    let mailer = MockMailer::new();
    let queue = MockQueue::new();
    let window = DelayWindow::new(10, 20).unwrap();

    let report = scheduler(&mailer, &queue)
        .submit_remote(
            &credentials(),
            &[],
            None,
            window,
            0,
            "https://app.example.com/api/dispatch",
        )
        .await;

    assert_eq!(report.attempted, 0);
    assert_eq!(report.submitted, 0);
    assert!(report.first_error.is_none());
    assert!(queue.submitted().is_empty());
}

#[tokio::test]
async fn remote_mode_start_offset_anchors_first_job() {
    let mailer = MockMailer::new();
    let queue = MockQueue::new();
    let messages = batch(&["a@example.com"]);
    let window = DelayWindow::new(120, 300).unwrap();

    let report = scheduler(&mailer, &queue)
        .submit_remote(
            &credentials(),
            &messages,
            None,
            window,
            300,
            "https://app.example.com/api/dispatch",
        )
        .await;

    assert_eq!(report.submitted, 1);
    assert_eq!(queue.submitted_delays(), [300]);
}
