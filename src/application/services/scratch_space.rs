use std::io;
use std::path::{Path, PathBuf};

/// Local, non-durable directory holding the files of in-flight requests.
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes `data` under `name`. The returned guard owns the file.
    pub async fn persist(&self, name: &str, data: &[u8]) -> io::Result<ScratchFile> {
        let file = self.reserve(name).await?;
        tokio::fs::write(file.path(), data).await?;
        tracing::debug!(path = %file.path().display(), bytes = data.len(), "Upload persisted");
        Ok(file)
    }

    /// Claims a path for a file some other step will produce.
    pub async fn reserve(&self, name: &str) -> io::Result<ScratchFile> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(ScratchFile {
            path: self.root.join(name),
        })
    }
}

/// A scratch file that is deleted when the guard goes out of scope.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether a file was actually removed. Removing twice is not an error.
    pub fn remove(&self) -> io::Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(e) = self.remove() {
            tracing::warn!(
                error = %e,
                path = %self.path.display(),
                "Failed to delete scratch file"
            );
        }
    }
}
