use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{SpeechToText, SpeechToTextError};

/// Hard request-size limit documented by the transcription API. The chunk
/// splitter keeps uploads under this with margin; the check here is a
/// last-resort guard against misconfiguration.
const SERVICE_BYTE_LIMIT: u64 = 25 * 1024 * 1024;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub struct OpenAiTranscriber {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiTranscriber {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Result<Self, SpeechToTextError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SpeechToTextError::ApiRequestFailed(format!("client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
        })
    }
}

#[async_trait]
impl SpeechToText for OpenAiTranscriber {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, SpeechToTextError> {
        if audio.len() as u64 > SERVICE_BYTE_LIMIT {
            return Err(SpeechToTextError::PayloadTooLarge(audio.len() as u64));
        }

        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part = multipart::Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str("audio/mpeg")
            .map_err(|e| SpeechToTextError::ApiRequestFailed(format!("mime: {e}")))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);

        tracing::debug!(model = %self.model, bytes = audio.len(), "Sending audio chunk for transcription");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechToTextError::ApiRequestFailed(format!("request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SpeechToTextError::ApiRequestFailed(format!(
                "status {status}: {body}"
            )));
        }

        let transcript = response
            .text()
            .await
            .map_err(|e| SpeechToTextError::InvalidResponse(format!("body: {e}")))?;

        tracing::info!(chars = transcript.len(), "Chunk transcription completed");

        Ok(transcript.trim().to_string())
    }
}
