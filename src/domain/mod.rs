mod analysis;
mod assessment;
mod audio_chunk;
mod review_key;
mod task;
mod task_status;

pub use analysis::{AnalysisReport, AnalysisScores, ReportParseError};
pub use assessment::{Assessment, MAX_STORED_TRANSCRIPT_CHARS};
pub use audio_chunk::AudioChunk;
pub use review_key::ReviewKey;
pub use task::ReviewTask;
pub use task_status::TaskStatus;
