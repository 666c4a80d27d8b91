use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    BatchTranscriptionClient, JobSnapshot, SpeechServiceError, TranscriptionJob,
};
use crate::domain::{PipelineStage, TranscriptionStatus};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(3600);

/// Waits for a remote job to reach a terminal status.
///
/// One status request is issued per interval. The wait is bounded by a
/// deadline and aborts as soon as the request's cancellation token fires.
pub struct JobPoller {
    client: Arc<dyn BatchTranscriptionClient>,
    interval: Duration,
    timeout: Duration,
}

impl JobPoller {
    pub fn new(
        client: Arc<dyn BatchTranscriptionClient>,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            interval,
            timeout,
        }
    }

    /// Returns the first snapshot whose status is terminal.
    ///
    /// Every status change is published on `progress` as
    /// [`PipelineStage::Polling`].
    pub async fn wait_for_terminal(
        &self,
        job: &TranscriptionJob,
        cancel: &CancellationToken,
        progress: &watch::Sender<PipelineStage>,
    ) -> Result<JobSnapshot, PollError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!("Polling cancelled");
                Err(PollError::Cancelled)
            }
            result = tokio::time::timeout(self.timeout, self.poll_loop(job, progress)) => {
                result.map_err(|_| PollError::TimedOut(self.timeout))?
            }
        }
    }

    async fn poll_loop(
        &self,
        job: &TranscriptionJob,
        progress: &watch::Sender<PipelineStage>,
    ) -> Result<JobSnapshot, PollError> {
        let mut last_status: Option<TranscriptionStatus> = None;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let snapshot = self.client.status(job).await?;

            if last_status != Some(snapshot.status) {
                tracing::debug!(
                    status = %snapshot.status,
                    attempts,
                    "Transcription job status transition"
                );
                progress.send_replace(PipelineStage::Polling(snapshot.status));
                last_status = Some(snapshot.status);
            }

            if snapshot.status.is_terminal() {
                tracing::info!(status = %snapshot.status, attempts, "Transcription job finished");
                return Ok(snapshot);
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("transcription job did not finish within {}s", .0.as_secs())]
    TimedOut(Duration),
    #[error("polling cancelled")]
    Cancelled,
    #[error("status request: {0}")]
    Client(#[from] SpeechServiceError),
}
