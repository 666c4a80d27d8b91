mod blob_name;
mod pipeline_stage;
mod sanitized_filename;
mod scratch_id;
mod storage_connection_string;
mod transcript;
mod transcription_outcome;
mod transcription_status;
mod word_timing;

pub use blob_name::BlobName;
pub use pipeline_stage::PipelineStage;
pub use sanitized_filename::SanitizedFilename;
pub use scratch_id::ScratchId;
pub use storage_connection_string::{ConnectionStringError, StorageConnectionString};
pub use transcript::Transcript;
pub use transcription_outcome::TranscriptionOutcome;
pub use transcription_status::TranscriptionStatus;
pub use word_timing::WordTiming;
