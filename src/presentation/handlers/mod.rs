mod health;
mod transcribe;

pub use health::health_handler;
pub use transcribe::{
    ErrorResponse, TranscriptionResponse, VIDEO_FIELD, WordTimingResponse, transcribe_handler,
};
