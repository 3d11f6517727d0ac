use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{MediaProcessor, MediaProcessorError};

const TARGET_SAMPLE_RATE: u32 = 16_000;
const AUDIO_BITRATE: &str = "64k";

/// Shells out to ffmpeg/ffprobe. Both tools are treated as black boxes: we
/// hand them paths and flags and read back exit status and, for the probe,
/// one number on stdout.
pub struct FfmpegProcessor {
    ffmpeg_bin: String,
    ffprobe_bin: String,
}

impl FfmpegProcessor {
    pub fn new() -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
        }
    }

    /// Override binary paths, e.g. for containers with non-standard layouts.
    pub fn with_binaries(ffmpeg_bin: impl Into<String>, ffprobe_bin: impl Into<String>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            ffprobe_bin: ffprobe_bin.into(),
        }
    }

    async fn run_ffmpeg(&self, args: &[&str]) -> Result<(), MediaProcessorError> {
        let output = Command::new(&self.ffmpeg_bin)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| MediaProcessorError::EncodeFailed(format!("spawn ffmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaProcessorError::EncodeFailed(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl Default for FfmpegProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaProcessor for FfmpegProcessor {
    async fn extract_audio(
        &self,
        source: &Path,
        output: &Path,
    ) -> Result<(), MediaProcessorError> {
        let source = source.to_string_lossy();
        let output = output.to_string_lossy();
        let sample_rate = TARGET_SAMPLE_RATE.to_string();

        tracing::debug!(source = %source, "Extracting mono audio track");

        self.run_ffmpeg(&[
            "-y",
            "-i",
            &source,
            "-vn",
            "-ac",
            "1",
            "-ar",
            &sample_rate,
            "-b:a",
            AUDIO_BITRATE,
            "-loglevel",
            "error",
            &output,
        ])
        .await
    }

    async fn probe_duration(&self, path: &Path) -> Result<f64, MediaProcessorError> {
        let path = path.to_string_lossy();
        let args: [&str; 7] = [
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
            &path,
        ];

        let output = Command::new(&self.ffprobe_bin)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| MediaProcessorError::ProbeFailed(format!("spawn ffprobe: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaProcessorError::ProbeFailed(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse::<f64>()
            .map_err(|e| MediaProcessorError::ProbeFailed(format!("unparseable duration: {e}")))
    }

    async fn encode_slice(
        &self,
        source: &Path,
        start_secs: f64,
        duration_secs: f64,
        output: &Path,
    ) -> Result<(), MediaProcessorError> {
        let source = source.to_string_lossy();
        let output = output.to_string_lossy();
        let start = format!("{start_secs:.3}");
        let duration = format!("{duration_secs:.3}");
        let sample_rate = TARGET_SAMPLE_RATE.to_string();

        tracing::debug!(start = %start, duration = %duration, "Encoding audio slice");

        self.run_ffmpeg(&[
            "-y",
            "-ss",
            &start,
            "-t",
            &duration,
            "-i",
            &source,
            "-ac",
            "1",
            "-ar",
            &sample_rate,
            "-b:a",
            AUDIO_BITRATE,
            "-loglevel",
            "error",
            &output,
        ])
        .await
    }
}
