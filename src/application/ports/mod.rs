mod audio_extractor;
mod batch_transcription_client;
mod blob_store;

pub use audio_extractor::{AudioExtractionError, AudioExtractor};
pub use batch_transcription_client::{
    BatchTranscriptionClient, JobSnapshot, SpeechServiceError, TranscriptionJob,
};
pub use blob_store::{BlobStore, BlobStoreError};
