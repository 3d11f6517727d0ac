use async_trait::async_trait;

/// External speech-to-text capability. Inputs must stay under the service's
/// byte ceiling; the chunk splitter guarantees that by construction.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, SpeechToTextError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechToTextError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(u64),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
