mod job_poller;
mod scratch_space;
mod transcription_service;

pub use job_poller::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, JobPoller, PollError};
pub use scratch_space::{ScratchFile, ScratchSpace};
pub use transcription_service::{
    DEFAULT_SAS_EXPIRY, TranscriptionService, TranscriptionServiceError, VideoUpload,
};
