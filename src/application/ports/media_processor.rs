use std::path::Path;

use async_trait::async_trait;

/// Transcoding primitives delegated to an external tool (ffmpeg in
/// production). The chunk-splitting math stays on our side; this port only
/// moves and measures audio.
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Extracts the audio track of `source` into `output` as mono
    /// fixed-sample-rate audio suitable for transcription.
    async fn extract_audio(&self, source: &Path, output: &Path)
    -> Result<(), MediaProcessorError>;

    /// Total duration of the audio stream in seconds.
    async fn probe_duration(&self, path: &Path) -> Result<f64, MediaProcessorError>;

    /// Re-encodes the time slice [start_secs, start_secs + duration_secs)
    /// of `source` into `output`.
    async fn encode_slice(
        &self,
        source: &Path,
        start_secs: f64,
        duration_secs: f64,
        output: &Path,
    ) -> Result<(), MediaProcessorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaProcessorError {
    #[error("media probe failed: {0}")]
    ProbeFailed(String),
    #[error("encode failed: {0}")]
    EncodeFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
