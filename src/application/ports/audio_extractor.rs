use std::path::Path;

use async_trait::async_trait;

/// Transcodes the audio track of a media file into mono 16 kHz 16-bit PCM WAV.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract(&self, input: &Path, output: &Path) -> Result<(), AudioExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioExtractionError {
    #[error("could not start converter: {0}")]
    Spawn(std::io::Error),
    #[error("{detail}")]
    Failed { detail: String },
    #[error("conversion timed out after {0}s")]
    TimedOut(u64),
}
