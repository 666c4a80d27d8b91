use std::fmt;

use super::TranscriptionStatus;

/// Where a single transcription request currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Converting,
    Uploading,
    Submitting,
    Polling(TranscriptionStatus),
    Assembling,
    CleaningUp,
    Finished,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Received => f.write_str("received"),
            PipelineStage::Converting => f.write_str("converting"),
            PipelineStage::Uploading => f.write_str("uploading"),
            PipelineStage::Submitting => f.write_str("submitting"),
            PipelineStage::Polling(status) => write!(f, "polling ({})", status),
            PipelineStage::Assembling => f.write_str("assembling"),
            PipelineStage::CleaningUp => f.write_str("cleaning up"),
            PipelineStage::Finished => f.write_str("finished"),
        }
    }
}
