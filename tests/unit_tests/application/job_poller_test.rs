use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use vidscribe::application::ports::{BatchTranscriptionClient, TranscriptionJob};
use vidscribe::application::services::{JobPoller, PollError};
use vidscribe::domain::{PipelineStage, TranscriptionStatus};

use crate::mocks::{MockSpeechClient, TEST_POLL_INTERVAL, failed_snapshot, snapshot};

fn job() -> TranscriptionJob {
    TranscriptionJob {
        status_url: Url::parse("https://mock.speech/transcriptions/1").unwrap(),
    }
}

fn poller(client: &Arc<MockSpeechClient>, timeout: Duration) -> JobPoller {
    JobPoller::new(
        Arc::clone(client) as Arc<dyn BatchTranscriptionClient>,
        TEST_POLL_INTERVAL,
        timeout,
    )
}

#[tokio::test(start_paused = true)]
async fn given_job_finishing_on_third_poll_when_waiting_then_requests_are_spaced_by_interval() {
    let client = Arc::new(MockSpeechClient::new(
        vec![
            snapshot(TranscriptionStatus::NotStarted),
            snapshot(TranscriptionStatus::Running),
            snapshot(TranscriptionStatus::Succeeded),
        ],
        &[],
    ));
    let (progress, receiver) = watch::channel(PipelineStage::Submitting);

    let result = poller(&client, Duration::from_secs(3600))
        .wait_for_terminal(&job(), &CancellationToken::new(), &progress)
        .await
        .unwrap();

    assert_eq!(result.status, TranscriptionStatus::Succeeded);
    assert!(result.files_url.is_some());

    let calls = client.status_calls();
    assert_eq!(calls.len(), 3);
    for pair in calls.windows(2) {
        assert!(pair[1] - pair[0] >= TEST_POLL_INTERVAL);
    }
    assert_eq!(
        *receiver.borrow(),
        PipelineStage::Polling(TranscriptionStatus::Succeeded)
    );
}

#[tokio::test(start_paused = true)]
async fn given_failed_job_when_waiting_then_failed_snapshot_is_returned_with_message() {
    let client = Arc::new(MockSpeechClient::new(vec![failed_snapshot("bad audio")], &[]));
    let (progress, _receiver) = watch::channel(PipelineStage::Submitting);

    let result = poller(&client, Duration::from_secs(3600))
        .wait_for_terminal(&job(), &CancellationToken::new(), &progress)
        .await
        .unwrap();

    assert_eq!(result.status, TranscriptionStatus::Failed);
    assert_eq!(result.error_message.as_deref(), Some("bad audio"));
    assert_eq!(client.status_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn given_job_never_finishing_when_deadline_passes_then_times_out() {
    let client = Arc::new(MockSpeechClient::new(
        vec![snapshot(TranscriptionStatus::Running)],
        &[],
    ));
    let (progress, _receiver) = watch::channel(PipelineStage::Submitting);

    let result = poller(&client, Duration::from_secs(12))
        .wait_for_terminal(&job(), &CancellationToken::new(), &progress)
        .await;

    assert!(matches!(result, Err(PollError::TimedOut(d)) if d == Duration::from_secs(12)));
    // Requests at 0s, 5s and 10s.
    assert_eq!(client.status_calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn given_cancellation_mid_poll_when_waiting_then_stops_issuing_requests() {
    let client = Arc::new(MockSpeechClient::new(
        vec![snapshot(TranscriptionStatus::Running)],
        &[],
    ));
    let (progress, _receiver) = watch::channel(PipelineStage::Submitting);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(7)).await;
        trigger.cancel();
    });

    let result = poller(&client, Duration::from_secs(3600))
        .wait_for_terminal(&job(), &cancel, &progress)
        .await;

    assert!(matches!(result, Err(PollError::Cancelled)));
    assert_eq!(client.status_calls().len(), 2);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(client.status_calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn given_status_request_rejected_when_waiting_then_client_error_propagates() {
    let client = Arc::new(MockSpeechClient::failing_status_requests());
    let (progress, _receiver) = watch::channel(PipelineStage::Submitting);

    let result = poller(&client, Duration::from_secs(3600))
        .wait_for_terminal(&job(), &CancellationToken::new(), &progress)
        .await;

    assert!(matches!(result, Err(PollError::Client(_))));
    assert_eq!(client.status_calls().len(), 1);
}
