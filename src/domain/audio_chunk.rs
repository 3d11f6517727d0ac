use std::path::PathBuf;

/// One time-contiguous slice of the extracted audio, sized to stay under the
/// transcription service's byte ceiling. The index defines transcription and
/// re-assembly order. Chunks live in the run's scratch directory and are gone
/// when the run ends.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    pub index: usize,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub start_secs: f64,
    /// None when the source fit under the ceiling and was passed through
    /// without probing.
    pub duration_secs: Option<f64>,
}
