#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;

use caresight::application::ports::{
    LlmClient, LlmClientError, MediaObject, MediaProcessor, MediaProcessorError, MediaStore,
    MediaStoreError, PromptSource, PromptSourceError, SpeechToText, SpeechToTextError,
};
use caresight::domain::{AnalysisReport, ReviewKey, ReviewTask, TaskStatus};

pub struct MockMediaStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MockMediaStore {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_object(name: &str, data: &[u8]) -> Self {
        let store = Self::new();
        store
            .objects
            .write()
            .unwrap()
            .insert(name.to_string(), data.to_vec());
        store
    }
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn download(&self, object_id: &str) -> Result<Vec<u8>, MediaStoreError> {
        self.objects
            .read()
            .unwrap()
            .get(object_id)
            .cloned()
            .ok_or_else(|| MediaStoreError::NotFound(object_id.to_string()))
    }

    async fn upload(
        &self,
        object_id: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<(), MediaStoreError> {
        self.objects
            .write()
            .unwrap()
            .insert(object_id.to_string(), data.to_vec());
        Ok(())
    }

    async fn remove(&self, object_id: &str) -> Result<(), MediaStoreError> {
        self.objects.write().unwrap().remove(object_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<MediaObject>, MediaStoreError> {
        Ok(self
            .objects
            .read()
            .unwrap()
            .iter()
            .map(|(name, data)| MediaObject {
                name: name.clone(),
                size_bytes: Some(data.len() as u64),
            })
            .collect())
    }

    async fn signed_url(
        &self,
        object_id: &str,
        _ttl: Duration,
    ) -> Result<String, MediaStoreError> {
        Ok(format!("https://signed.example/{object_id}"))
    }
}

/// Stands in for ffmpeg: extraction copies the file through, the probe
/// reports a configured duration, and each slice becomes a small marker file
/// naming its start offset.
pub struct FakeMediaProcessor {
    pub duration_secs: f64,
}

impl FakeMediaProcessor {
    pub fn new(duration_secs: f64) -> Self {
        Self { duration_secs }
    }
}

#[async_trait]
impl MediaProcessor for FakeMediaProcessor {
    async fn extract_audio(
        &self,
        source: &Path,
        output: &Path,
    ) -> Result<(), MediaProcessorError> {
        tokio::fs::copy(source, output).await?;
        Ok(())
    }

    async fn probe_duration(&self, _path: &Path) -> Result<f64, MediaProcessorError> {
        Ok(self.duration_secs)
    }

    async fn encode_slice(
        &self,
        _source: &Path,
        start_secs: f64,
        _duration_secs: f64,
        output: &Path,
    ) -> Result<(), MediaProcessorError> {
        tokio::fs::write(output, format!("slice@{start_secs:.0}")).await?;
        Ok(())
    }
}

/// Probe always fails; for exercising the abort path of the splitter.
pub struct BrokenProbeProcessor;

#[async_trait]
impl MediaProcessor for BrokenProbeProcessor {
    async fn extract_audio(
        &self,
        source: &Path,
        output: &Path,
    ) -> Result<(), MediaProcessorError> {
        tokio::fs::copy(source, output).await?;
        Ok(())
    }

    async fn probe_duration(&self, _path: &Path) -> Result<f64, MediaProcessorError> {
        Err(MediaProcessorError::ProbeFailed(
            "no duration in container".to_string(),
        ))
    }

    async fn encode_slice(
        &self,
        _source: &Path,
        _start_secs: f64,
        _duration_secs: f64,
        _output: &Path,
    ) -> Result<(), MediaProcessorError> {
        Err(MediaProcessorError::EncodeFailed("unreachable".to_string()))
    }
}

/// Encode always fails after a successful probe.
pub struct BrokenEncodeProcessor {
    pub duration_secs: f64,
}

#[async_trait]
impl MediaProcessor for BrokenEncodeProcessor {
    async fn extract_audio(
        &self,
        source: &Path,
        output: &Path,
    ) -> Result<(), MediaProcessorError> {
        tokio::fs::copy(source, output).await?;
        Ok(())
    }

    async fn probe_duration(&self, _path: &Path) -> Result<f64, MediaProcessorError> {
        Ok(self.duration_secs)
    }

    async fn encode_slice(
        &self,
        _source: &Path,
        _start_secs: f64,
        _duration_secs: f64,
        _output: &Path,
    ) -> Result<(), MediaProcessorError> {
        Err(MediaProcessorError::EncodeFailed(
            "codec exploded".to_string(),
        ))
    }
}

/// Returns each chunk's bytes back as its transcript.
pub struct EchoSpeechToText;

#[async_trait]
impl SpeechToText for EchoSpeechToText {
    async fn transcribe(&self, audio: &[u8], _filename: &str) -> Result<String, SpeechToTextError> {
        Ok(String::from_utf8_lossy(audio).to_string())
    }
}

/// Replays queued responses, then falls back to a default. Counts calls, and
/// can hold the first call until released to keep a run in flight.
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<String>>,
    default_response: String,
    pub calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedLlm {
    pub fn new(default_response: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default_response: default_response.into(),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn with_responses(
        default_response: impl Into<String>,
        responses: Vec<String>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            default_response: default_response.into(),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn gated(default_response: impl Into<String>, gate: Arc<Notify>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default_response: default_response.into(),
            calls: AtomicUsize::new(0),
            gate: Some(gate),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(
        &self,
        _system_instruction: &str,
        _user_content: &str,
    ) -> Result<String, LlmClientError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 && let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.default_response.clone()))
    }
}

pub struct StaticPrompts;

impl PromptSource for StaticPrompts {
    fn analysis_instruction(&self) -> Result<String, PromptSourceError> {
        Ok("Analyze the session segment.".to_string())
    }

    fn merge_instruction(&self) -> Result<String, PromptSourceError> {
        Ok("Merge the partial evaluations.".to_string())
    }
}

pub fn report_json(marker: &str) -> String {
    format!(
        r#"{{
            "summary": "{marker}",
            "strengths": ["listened closely"],
            "improvements": ["ask more open questions"],
            "risk_flags": [],
            "scores": {{
                "empathy": 4,
                "active_listening": 4,
                "clarity": 3,
                "problem_solving": 3
            }},
            "overall_comment": "solid session"
        }}"#
    )
}

pub fn report(marker: &str) -> AnalysisReport {
    AnalysisReport::from_llm_response(&report_json(marker)).unwrap()
}

/// Polls the tracker until the run reaches a terminal state.
pub async fn wait_until_terminal(
    tracker: &caresight::application::services::TaskTracker,
    key: &ReviewKey,
) -> ReviewTask {
    for _ in 0..500 {
        if let Some(task) = tracker.get(key)
            && task.status != TaskStatus::Processing
        {
            return task;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("run for {key} did not finish in time");
}
