use std::fmt;
use std::str::FromStr;

/// Lifecycle of a remote batch transcription job, in the service's own vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptionStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl TranscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptionStatus::NotStarted => "NotStarted",
            TranscriptionStatus::Running => "Running",
            TranscriptionStatus::Succeeded => "Succeeded",
            TranscriptionStatus::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TranscriptionStatus::Succeeded | TranscriptionStatus::Failed
        )
    }
}

impl FromStr for TranscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NotStarted" => Ok(TranscriptionStatus::NotStarted),
            "Running" => Ok(TranscriptionStatus::Running),
            "Succeeded" => Ok(TranscriptionStatus::Succeeded),
            "Failed" => Ok(TranscriptionStatus::Failed),
            _ => Err(format!("Invalid transcription status: {}", s)),
        }
    }
}

impl fmt::Display for TranscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
