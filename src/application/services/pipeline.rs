use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{
    AssessmentRepository, AssessmentRepositoryError, LlmClient, LlmClientError, MediaProcessor,
    MediaProcessorError, MediaStore, MediaStoreError, PromptSource, PromptSourceError,
    SpeechToText, SpeechToTextError, TranscriptWindower,
};
use crate::application::services::chunk_splitter::{ChunkSplitter, ChunkSplitterError};
use crate::application::services::task_tracker::TaskTracker;
use crate::domain::{AnalysisReport, Assessment, AudioChunk, ReportParseError, ReviewKey};

// Progress checkpoints for a run. Transcription fills 0.15..0.50
// proportionally per chunk, analysis fills 0.50..0.90 per window.
const PROGRESS_DOWNLOADED: f32 = 0.05;
const PROGRESS_AUDIO_EXTRACTED: f32 = 0.10;
const PROGRESS_CHUNKED: f32 = 0.15;
const PROGRESS_TRANSCRIBED: f32 = 0.50;
const PROGRESS_ANALYZED: f32 = 0.90;
const PROGRESS_MERGED: f32 = 0.95;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Byte ceiling per transcription request, with margin under the
    /// service's hard limit.
    pub chunk_byte_ceiling: u64,
    /// Model identifier recorded on the persisted assessment.
    pub model_name: String,
}

/// Sequences one review run end to end: download, audio extraction, chunk
/// split, sequential transcription, windowed analysis, merge, persist. All
/// stages within a run are strictly sequential; concurrency exists only
/// across runs for different keys.
pub struct ReviewPipeline {
    media_store: Arc<dyn MediaStore>,
    processor: Arc<dyn MediaProcessor>,
    chunk_splitter: ChunkSplitter,
    speech_to_text: Arc<dyn SpeechToText>,
    windower: Arc<dyn TranscriptWindower>,
    llm: Arc<dyn LlmClient>,
    prompts: Arc<dyn PromptSource>,
    assessments: Arc<dyn AssessmentRepository>,
    tracker: Arc<TaskTracker>,
    config: PipelineConfig,
}

impl ReviewPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        media_store: Arc<dyn MediaStore>,
        processor: Arc<dyn MediaProcessor>,
        speech_to_text: Arc<dyn SpeechToText>,
        windower: Arc<dyn TranscriptWindower>,
        llm: Arc<dyn LlmClient>,
        prompts: Arc<dyn PromptSource>,
        assessments: Arc<dyn AssessmentRepository>,
        tracker: Arc<TaskTracker>,
        config: PipelineConfig,
    ) -> Self {
        let chunk_splitter = ChunkSplitter::new(Arc::clone(&processor), config.chunk_byte_ceiling);
        Self {
            media_store,
            processor,
            chunk_splitter,
            speech_to_text,
            windower,
            llm,
            prompts,
            assessments,
            tracker,
            config,
        }
    }

    /// Drives one run to a terminal tracker state. The caller must have
    /// registered the processing record via the tracker already.
    pub async fn run(&self, key: ReviewKey) {
        match self.execute(&key).await {
            Ok(()) => {
                self.tracker.complete(&key);
                tracing::info!("Review completed");
            }
            Err(e) => {
                tracing::error!(error = %e, "Review failed");
                self.tracker.fail(&key, &e.to_string());
            }
        }
    }

    async fn execute(&self, key: &ReviewKey) -> Result<(), PipelineError> {
        // Scratch space for the downloaded source, extracted audio and chunk
        // files. Dropped when this function returns, success or failure.
        let workdir = tempfile::tempdir()?;

        self.tracker.update(key, 0.01, "Downloading recording");
        let media = self
            .media_store
            .download(key.object_id())
            .await
            .map_err(PipelineError::Download)?;
        let source_path = workdir.path().join(source_file_name(key.object_id()));
        tokio::fs::write(&source_path, &media).await?;
        drop(media);
        self.tracker
            .update(key, PROGRESS_DOWNLOADED, "Extracting audio");

        let audio_path = workdir.path().join("audio.mp3");
        self.processor
            .extract_audio(&source_path, &audio_path)
            .await
            .map_err(PipelineError::Extraction)?;
        self.tracker
            .update(key, PROGRESS_AUDIO_EXTRACTED, "Splitting audio");

        let chunks = self
            .chunk_splitter
            .split(&audio_path, workdir.path())
            .await
            .map_err(PipelineError::Chunking)?;
        self.tracker.update(
            key,
            PROGRESS_CHUNKED,
            format!("Transcribing {} chunk(s)", chunks.len()),
        );

        let transcript = self.transcribe_chunks(key, &chunks).await?;
        self.tracker
            .update(key, PROGRESS_TRANSCRIBED, "Analyzing transcript");

        let windows = self.windower.split(&transcript);
        let partials = self.analyze_windows(key, &windows).await?;
        self.tracker
            .update(key, PROGRESS_ANALYZED, "Merging partial analyses");

        let report = self.merge_reports(partials).await?;
        self.tracker
            .update(key, PROGRESS_MERGED, "Persisting assessment");

        let assessment = Assessment::new(
            key.clone(),
            transcript,
            self.config.model_name.clone(),
            report,
        );
        self.assessments
            .upsert(&assessment)
            .await
            .map_err(PipelineError::Persistence)?;

        Ok(())
    }

    /// Transcribes chunks strictly in sequence order and joins the partial
    /// transcripts with a single space. A sentence cut at a chunk boundary
    /// may read awkwardly but is never dropped. Any chunk failure aborts the
    /// run; transcription has no partial-success path.
    async fn transcribe_chunks(
        &self,
        key: &ReviewKey,
        chunks: &[AudioChunk],
    ) -> Result<String, PipelineError> {
        let mut parts = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let audio = tokio::fs::read(&chunk.path).await?;
            let filename = chunk
                .path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("chunk.mp3");

            let text = self
                .speech_to_text
                .transcribe(&audio, filename)
                .await
                .map_err(PipelineError::Transcription)?;
            parts.push(text.trim().to_string());

            let done = (chunk.index + 1) as f32 / chunks.len() as f32;
            self.tracker.update(
                key,
                PROGRESS_CHUNKED + done * (PROGRESS_TRANSCRIBED - PROGRESS_CHUNKED),
                format!("Transcribed chunk {}/{}", chunk.index + 1, chunks.len()),
            );
        }

        Ok(parts.join(" "))
    }

    /// One LLM call per window, strictly in window order. A single malformed
    /// response aborts the run; there is no skip-and-continue.
    async fn analyze_windows(
        &self,
        key: &ReviewKey,
        windows: &[String],
    ) -> Result<Vec<AnalysisReport>, PipelineError> {
        let instruction = self
            .prompts
            .analysis_instruction()
            .map_err(PipelineError::Prompt)?;

        let mut reports = Vec::with_capacity(windows.len());
        for (i, window) in windows.iter().enumerate() {
            let raw = self
                .llm
                .complete(&instruction, window)
                .await
                .map_err(PipelineError::Llm)?;
            let report =
                AnalysisReport::from_llm_response(&raw).map_err(PipelineError::AnalysisParse)?;
            reports.push(report);

            let done = (i + 1) as f32 / windows.len() as f32;
            self.tracker.update(
                key,
                PROGRESS_TRANSCRIBED + done * (PROGRESS_ANALYZED - PROGRESS_TRANSCRIBED),
                format!("Analyzed window {}/{}", i + 1, windows.len()),
            );
        }

        Ok(reports)
    }

    /// A single partial is the canonical result as-is; no merge call is spent
    /// on short recordings. Multiple partials go through one further LLM call
    /// that deduplicates and reconciles them into the canonical schema. The
    /// serialized array keeps window order.
    async fn merge_reports(
        &self,
        mut reports: Vec<AnalysisReport>,
    ) -> Result<AnalysisReport, PipelineError> {
        if reports.len() == 1 {
            return Ok(reports.remove(0));
        }

        let instruction = self
            .prompts
            .merge_instruction()
            .map_err(PipelineError::Prompt)?;
        let payload =
            serde_json::to_string(&reports).map_err(|e| PipelineError::Merge(e.to_string()))?;

        tracing::debug!(partials = reports.len(), "Merging partial analyses");

        let raw = self
            .llm
            .complete(&instruction, &payload)
            .await
            .map_err(PipelineError::Llm)?;
        AnalysisReport::from_llm_response(&raw).map_err(|e| PipelineError::Merge(e.to_string()))
    }
}

/// Keeps the uploaded file's extension so the transcoder can sniff the
/// container format.
fn source_file_name(object_id: &str) -> String {
    match Path::new(object_id).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("source.{ext}"),
        None => "source.bin".to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("download: {0}")]
    Download(MediaStoreError),
    #[error("audio extraction: {0}")]
    Extraction(MediaProcessorError),
    #[error("chunking: {0}")]
    Chunking(ChunkSplitterError),
    #[error("transcription: {0}")]
    Transcription(SpeechToTextError),
    #[error("llm: {0}")]
    Llm(LlmClientError),
    #[error("analysis response: {0}")]
    AnalysisParse(ReportParseError),
    #[error("merge: {0}")]
    Merge(String),
    #[error("prompt: {0}")]
    Prompt(PromptSourceError),
    #[error("persistence: {0}")]
    Persistence(AssessmentRepositoryError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
