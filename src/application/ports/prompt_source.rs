/// Source of the two system instructions driving the LLM calls. Contents are
/// opaque to the pipeline; implementations may hot-reload from disk.
pub trait PromptSource: Send + Sync {
    fn analysis_instruction(&self) -> Result<String, PromptSourceError>;

    fn merge_instruction(&self) -> Result<String, PromptSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PromptSourceError {
    #[error("prompt unavailable: {0}")]
    Unavailable(String),
}
