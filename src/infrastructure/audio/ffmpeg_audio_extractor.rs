use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioExtractionError, AudioExtractor};

pub const DEFAULT_CONVERSION_TIMEOUT: Duration = Duration::from_secs(600);
const TARGET_SAMPLE_RATE: u32 = 16_000;
const TARGET_CHANNELS: u16 = 1;
const STDERR_TAIL_LINES: usize = 20;

/// Extracts audio by running the `ffmpeg` binary as a child process.
pub struct FfmpegAudioExtractor {
    program: PathBuf,
    timeout: Duration,
}

impl FfmpegAudioExtractor {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-nostdin")
            .arg("-hide_banner")
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-vn", "-acodec", "pcm_s16le"])
            .args(["-ac", &TARGET_CHANNELS.to_string()])
            .args(["-ar", &TARGET_SAMPLE_RATE.to_string()])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

impl Default for FfmpegAudioExtractor {
    fn default() -> Self {
        Self::new("ffmpeg", DEFAULT_CONVERSION_TIMEOUT)
    }
}

#[async_trait]
impl AudioExtractor for FfmpegAudioExtractor {
    #[tracing::instrument(skip(self), fields(program = %self.program.display()))]
    async fn extract(&self, input: &Path, output: &Path) -> Result<(), AudioExtractionError> {
        let child = self
            .command(input, output)
            .spawn()
            .map_err(AudioExtractionError::Spawn)?;

        // Dropping the future on timeout drops the child, which kills it.
        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| AudioExtractionError::TimedOut(self.timeout.as_secs()))?
            .map_err(AudioExtractionError::Spawn)?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let detail = format!("{}: {}", result.status, stderr_tail(&stderr));
            tracing::error!(status = %result.status, "ffmpeg exited unsuccessfully");
            return Err(AudioExtractionError::Failed { detail });
        }

        tracing::debug!(output = %output.display(), "ffmpeg conversion finished");
        Ok(())
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
