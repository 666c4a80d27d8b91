use std::fmt;

use uuid::Uuid;

use super::SanitizedFilename;

/// Per-request identifier used to name every scratch file and blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScratchId(Uuid);

impl ScratchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Scratch name of the stored upload: `<id>-<filename>`.
    pub fn upload_name(&self, filename: &SanitizedFilename) -> String {
        format!("{}-{}", self.0, filename.as_str())
    }

    /// Scratch name of the converted audio artifact.
    pub fn artifact_name(&self) -> String {
        format!("temp-audio-{}.wav", self.0)
    }
}

impl Default for ScratchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScratchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
