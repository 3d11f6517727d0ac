mod analysis_service;
mod chunk_splitter;
mod pipeline;
mod task_tracker;

pub use analysis_service::{AnalysisService, StartOutcome};
pub use chunk_splitter::{ChunkSplitter, ChunkSplitterError};
pub use pipeline::{PipelineConfig, PipelineError, ReviewPipeline};
pub use task_tracker::{DuplicateRun, TaskTracker};
