mod azure_batch_transcription_client;

pub use azure_batch_transcription_client::{
    API_PATH, AzureBatchTranscriptionClient, DEFAULT_DISPLAY_NAME, DEFAULT_LOCALE,
    DEFAULT_PUNCTUATION_MODE, JobOptions,
};
