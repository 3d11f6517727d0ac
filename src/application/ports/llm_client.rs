use async_trait::async_trait;

/// External LLM capability. Implementations must request a strict-JSON
/// response mode; the caller parses the returned text into the canonical
/// report schema.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        system_instruction: &str,
        user_content: &str,
    ) -> Result<String, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
