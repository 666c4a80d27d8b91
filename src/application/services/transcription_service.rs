use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::application::ports::{
    AudioExtractionError, AudioExtractor, BatchTranscriptionClient, BlobStore, BlobStoreError,
    SpeechServiceError,
};
use crate::domain::{
    BlobName, PipelineStage, SanitizedFilename, ScratchId, TranscriptionOutcome,
    TranscriptionStatus,
};

use super::job_poller::{JobPoller, PollError};
use super::scratch_space::{ScratchFile, ScratchSpace};

pub const DEFAULT_SAS_EXPIRY: Duration = Duration::from_secs(3600);

/// A video received from a client.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub filename: SanitizedFilename,
    pub data: Bytes,
}

/// Runs one video through conversion, upload, batch transcription and cleanup.
pub struct TranscriptionService {
    scratch: ScratchSpace,
    extractor: Arc<dyn AudioExtractor>,
    blob_store: Arc<dyn BlobStore>,
    speech_client: Arc<dyn BatchTranscriptionClient>,
    poller: JobPoller,
    sas_expiry: Duration,
}

impl TranscriptionService {
    pub fn new(
        scratch: ScratchSpace,
        extractor: Arc<dyn AudioExtractor>,
        blob_store: Arc<dyn BlobStore>,
        speech_client: Arc<dyn BatchTranscriptionClient>,
        poller: JobPoller,
        sas_expiry: Duration,
    ) -> Self {
        Self {
            scratch,
            extractor,
            blob_store,
            speech_client,
            poller,
            sas_expiry,
        }
    }

    pub async fn transcribe(
        &self,
        upload: VideoUpload,
        cancel: &CancellationToken,
    ) -> Result<TranscriptionOutcome, TranscriptionServiceError> {
        let (progress, _) = watch::channel(PipelineStage::Received);
        self.transcribe_with_progress(upload, cancel, &progress)
            .await
    }

    /// Like [`Self::transcribe`], publishing every stage change on `progress`.
    pub async fn transcribe_with_progress(
        &self,
        upload: VideoUpload,
        cancel: &CancellationToken,
        progress: &watch::Sender<PipelineStage>,
    ) -> Result<TranscriptionOutcome, TranscriptionServiceError> {
        let id = ScratchId::new();
        let span = tracing::info_span!(
            "transcription",
            scratch_id = %id,
            filename = %upload.filename,
            bytes = upload.data.len(),
        );

        self.run(id, upload, cancel, progress)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        id: ScratchId,
        upload: VideoUpload,
        cancel: &CancellationToken,
        progress: &watch::Sender<PipelineStage>,
    ) -> Result<TranscriptionOutcome, TranscriptionServiceError> {
        advance(progress, PipelineStage::Received);

        let video = self
            .scratch
            .persist(&id.upload_name(&upload.filename), &upload.data)
            .await
            .map_err(TranscriptionServiceError::Scratch)?;
        let audio = self
            .scratch
            .reserve(&id.artifact_name())
            .await
            .map_err(TranscriptionServiceError::Scratch)?;

        advance(progress, PipelineStage::Converting);
        tracing::info!("Extracting audio");
        cancellable(cancel, self.extractor.extract(video.path(), audio.path())).await??;

        let blob = BlobName::for_artifact(audio.path()).ok_or_else(|| {
            TranscriptionServiceError::Scratch(io::Error::new(
                io::ErrorKind::InvalidInput,
                "artifact path has no file name",
            ))
        })?;

        let result = self.run_remote(&blob, &audio, cancel, progress).await;

        advance(progress, PipelineStage::CleaningUp);
        tracing::info!("Cleaning up");
        if let Err(e) = self.blob_store.delete(&blob).await {
            tracing::warn!(error = %e, blob = %blob, "Failed to delete uploaded blob");
        }
        release(&video);
        release(&audio);
        advance(progress, PipelineStage::Finished);

        result
    }

    async fn run_remote(
        &self,
        blob: &BlobName,
        audio: &ScratchFile,
        cancel: &CancellationToken,
        progress: &watch::Sender<PipelineStage>,
    ) -> Result<TranscriptionOutcome, TranscriptionServiceError> {
        advance(progress, PipelineStage::Uploading);
        let data = tokio::fs::read(audio.path())
            .await
            .map_err(TranscriptionServiceError::Scratch)?;
        tracing::info!(blob = %blob, bytes = data.len(), "Uploading audio");
        cancellable(cancel, self.blob_store.upload(blob, Bytes::from(data))).await??;

        let content_url = self
            .blob_store
            .signed_read_url(blob, self.sas_expiry)
            .await?;

        advance(progress, PipelineStage::Submitting);
        tracing::info!("Starting batch transcription job");
        let job = cancellable(cancel, self.speech_client.submit(&content_url)).await??;
        tracing::debug!(status_url = %job.status_url, "Transcription job submitted");

        let snapshot = self.poller.wait_for_terminal(&job, cancel, progress).await?;

        match snapshot.status {
            TranscriptionStatus::Succeeded => {
                advance(progress, PipelineStage::Assembling);
                let files_url = snapshot.files_url.ok_or_else(|| {
                    SpeechServiceError::InvalidResponse(
                        "succeeded job has no files link".to_string(),
                    )
                })?;
                let transcript =
                    cancellable(cancel, self.speech_client.fetch_transcript(&files_url)).await??;
                tracing::info!(phrases = transcript.phrases().len(), "Transcript assembled");
                Ok(TranscriptionOutcome::Completed(transcript))
            }
            _ => {
                tracing::warn!(
                    error = snapshot.error_message.as_deref().unwrap_or("none"),
                    "Transcription job failed"
                );
                Ok(TranscriptionOutcome::failed(snapshot.error_message))
            }
        }
    }
}

fn advance(progress: &watch::Sender<PipelineStage>, stage: PipelineStage) {
    tracing::debug!(stage = %stage, "Pipeline stage transition");
    progress.send_replace(stage);
}

fn release(file: &ScratchFile) {
    if let Err(e) = file.remove() {
        tracing::warn!(error = %e, path = %file.path().display(), "Failed to delete scratch file");
    }
}

async fn cancellable<F, T>(
    cancel: &CancellationToken,
    future: F,
) -> Result<T, TranscriptionServiceError>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TranscriptionServiceError::Cancelled),
        value = future => Ok(value),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionServiceError {
    #[error("scratch storage: {0}")]
    Scratch(io::Error),
    #[error("FFmpeg failed: {0}")]
    Conversion(#[from] AudioExtractionError),
    #[error("blob storage: {0}")]
    BlobStore(#[from] BlobStoreError),
    #[error("speech service: {0}")]
    Speech(#[from] SpeechServiceError),
    #[error("Transcription timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
    #[error("Transcription cancelled")]
    Cancelled,
}

impl From<PollError> for TranscriptionServiceError {
    fn from(error: PollError) -> Self {
        match error {
            PollError::TimedOut(after) => Self::TimedOut(after),
            PollError::Cancelled => Self::Cancelled,
            PollError::Client(e) => Self::Speech(e),
        }
    }
}
