use chrono::{DateTime, Utc};

use super::{ReviewKey, TaskStatus};

/// Tracker record for one pipeline run. Owned by the pipeline for the
/// duration of the run; callers only ever see clones.
#[derive(Debug, Clone)]
pub struct ReviewTask {
    pub key: ReviewKey,
    pub status: TaskStatus,
    pub progress: f32,
    pub message: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl ReviewTask {
    pub fn new(key: ReviewKey) -> Self {
        Self {
            key,
            status: TaskStatus::Processing,
            progress: 0.0,
            message: "Queued".to_string(),
            started_at: Utc::now(),
            finished_at: None,
            error: None,
        }
    }
}
