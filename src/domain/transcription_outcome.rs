use super::{Transcript, WordTiming};

const UNKNOWN_ERROR: &str = "Unknown error";

/// Terminal result of a transcription job.
///
/// A job that the remote service reports as failed is still an outcome, not an
/// error: it is surfaced to the caller as payload text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionOutcome {
    Completed(Transcript),
    Failed { message: String },
}

impl TranscriptionOutcome {
    pub fn failed(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        Self::Failed { message }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Word timings of a completed transcript, when they were requested.
    pub fn words(&self) -> Option<&[WordTiming]> {
        match self {
            Self::Completed(transcript) => transcript.words(),
            Self::Failed { .. } => None,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Completed(transcript) => transcript.text(),
            Self::Failed { message } => format!("Transcription Failed: {}", message),
        }
    }
}
