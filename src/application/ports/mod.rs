mod assessment_repository;
mod llm_client;
mod media_processor;
mod media_store;
mod prompt_source;
mod speech_to_text;
mod transcript_windower;

pub use assessment_repository::{AssessmentRepository, AssessmentRepositoryError};
pub use llm_client::{LlmClient, LlmClientError};
pub use media_processor::{MediaProcessor, MediaProcessorError};
pub use media_store::{MediaObject, MediaStore, MediaStoreError};
pub use prompt_source::{PromptSource, PromptSourceError};
pub use speech_to_text::{SpeechToText, SpeechToTextError};
pub use transcript_windower::TranscriptWindower;
