use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{MediaProcessor, MediaProcessorError};
use crate::domain::AudioChunk;

/// Splits extracted audio into sequential sub-clips that each stay under the
/// transcription service's byte ceiling.
///
/// A stream already under the ceiling is copied through untouched — no
/// re-encode, no probe. Anything larger is cut into ceil(size / ceiling)
/// uniform time slices; a probe or encode failure aborts the run, there is no
/// retry at this layer.
pub struct ChunkSplitter {
    processor: Arc<dyn MediaProcessor>,
    byte_ceiling: u64,
}

impl ChunkSplitter {
    pub fn new(processor: Arc<dyn MediaProcessor>, byte_ceiling: u64) -> Self {
        Self {
            processor,
            byte_ceiling,
        }
    }

    pub async fn split(
        &self,
        audio: &Path,
        workdir: &Path,
    ) -> Result<Vec<AudioChunk>, ChunkSplitterError> {
        let size = tokio::fs::metadata(audio).await?.len();

        if size <= self.byte_ceiling {
            let path = workdir.join(chunk_file_name(0));
            tokio::fs::copy(audio, &path).await?;
            tracing::debug!(bytes = size, "Audio under ceiling, single chunk");
            return Ok(vec![AudioChunk {
                index: 0,
                path,
                size_bytes: size,
                start_secs: 0.0,
                duration_secs: None,
            }]);
        }

        let total_secs = self.processor.probe_duration(audio).await?;
        if total_secs <= 0.0 {
            return Err(ChunkSplitterError::Probe(format!(
                "non-positive duration: {total_secs}"
            )));
        }

        let count = size.div_ceil(self.byte_ceiling) as usize;
        let slice_secs = total_secs / count as f64;

        tracing::info!(
            bytes = size,
            total_secs,
            chunks = count,
            slice_secs,
            "Splitting audio into chunks"
        );

        let mut chunks = Vec::with_capacity(count);
        for index in 0..count {
            let start_secs = index as f64 * slice_secs;
            let path = workdir.join(chunk_file_name(index));
            self.processor
                .encode_slice(audio, start_secs, slice_secs, &path)
                .await?;
            let size_bytes = tokio::fs::metadata(&path).await?.len();
            chunks.push(AudioChunk {
                index,
                path,
                size_bytes,
                start_secs,
                duration_secs: Some(slice_secs),
            });
        }

        Ok(chunks)
    }
}

fn chunk_file_name(index: usize) -> String {
    format!("chunk_{index:03}.mp3")
}

#[derive(Debug, thiserror::Error)]
pub enum ChunkSplitterError {
    #[error("media probe failed: {0}")]
    Probe(String),
    #[error("chunk encode failed: {0}")]
    Encode(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MediaProcessorError> for ChunkSplitterError {
    fn from(e: MediaProcessorError) -> Self {
        match e {
            MediaProcessorError::ProbeFailed(msg) => ChunkSplitterError::Probe(msg),
            MediaProcessorError::EncodeFailed(msg) => ChunkSplitterError::Encode(msg),
            MediaProcessorError::Io(io) => ChunkSplitterError::Io(io),
        }
    }
}
