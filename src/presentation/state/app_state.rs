use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::services::TranscriptionService;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 300 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    /// Parent of every request's cancellation token; cancelled on shutdown.
    pub shutdown: CancellationToken,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(transcription_service: Arc<TranscriptionService>) -> Self {
        Self {
            transcription_service,
            shutdown: CancellationToken::new(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
