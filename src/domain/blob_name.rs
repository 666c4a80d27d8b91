use std::fmt;
use std::path::Path;

/// Name of an object inside the remote audio container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobName(String);

impl BlobName {
    /// The blob mirrors the local artifact: its name is the artifact's basename.
    pub fn for_artifact(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .map(|n| Self(n.to_string()))
    }

    pub fn from_raw(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
