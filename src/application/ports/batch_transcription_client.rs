use async_trait::async_trait;
use reqwest::Url;

use crate::domain::{Transcript, TranscriptionStatus};

/// Handle to a submitted job: the service's self-referential status URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionJob {
    pub status_url: Url,
}

/// One observation of a job's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub status: TranscriptionStatus,
    pub files_url: Option<Url>,
    pub error_message: Option<String>,
}

#[async_trait]
pub trait BatchTranscriptionClient: Send + Sync {
    async fn submit(&self, content_url: &Url) -> Result<TranscriptionJob, SpeechServiceError>;

    async fn status(&self, job: &TranscriptionJob) -> Result<JobSnapshot, SpeechServiceError>;

    /// Locates the `Transcription` result file and assembles its phrases.
    async fn fetch_transcript(&self, files_url: &Url) -> Result<Transcript, SpeechServiceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechServiceError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("transcription result file not found")]
    MissingResultFile,
}
