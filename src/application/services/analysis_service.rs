use std::sync::Arc;

use tracing::Instrument;

use crate::application::ports::{AssessmentRepository, AssessmentRepositoryError};
use crate::application::services::pipeline::ReviewPipeline;
use crate::application::services::task_tracker::TaskTracker;
use crate::domain::{Assessment, ReviewKey, ReviewTask, TaskStatus};

/// Outcome of an accept request. Accepting never blocks on the run itself.
#[derive(Debug)]
pub enum StartOutcome {
    /// A fresh run was registered and spawned.
    Started(ReviewTask),
    /// A run is already in flight for this key; its record is returned
    /// instead of starting duplicate work.
    AlreadyProcessing(ReviewTask),
    /// A persisted assessment exists and `force` was not set; no run and no
    /// external calls are spent.
    AlreadyCompleted(Box<Assessment>),
    /// The last run failed and `force` was not set. Failed runs are never
    /// retried implicitly; the error record is returned instead.
    PreviousRunFailed(ReviewTask),
}

/// Front door of the pipeline: idempotency checks, synchronous registration
/// of the task record, and the spawn of the background run.
pub struct AnalysisService {
    pipeline: Arc<ReviewPipeline>,
    tracker: Arc<TaskTracker>,
    assessments: Arc<dyn AssessmentRepository>,
}

impl AnalysisService {
    pub fn new(
        pipeline: Arc<ReviewPipeline>,
        tracker: Arc<TaskTracker>,
        assessments: Arc<dyn AssessmentRepository>,
    ) -> Self {
        Self {
            pipeline,
            tracker,
            assessments,
        }
    }

    /// Accepts a review request. The task record is registered before this
    /// returns, so an immediate status poll always finds it; the run itself
    /// proceeds on its own tokio task.
    pub async fn start(
        &self,
        key: ReviewKey,
        force: bool,
    ) -> Result<StartOutcome, AssessmentRepositoryError> {
        if let Some(task) = self.tracker.get(&key) {
            match task.status {
                TaskStatus::Processing => {
                    return Ok(StartOutcome::AlreadyProcessing(task));
                }
                TaskStatus::Error if !force => {
                    return Ok(StartOutcome::PreviousRunFailed(task));
                }
                _ => {}
            }
        }

        if !force {
            if let Some(existing) = self.assessments.get(&key).await? {
                tracing::debug!(key = %key, "Returning persisted assessment, no run started");
                return Ok(StartOutcome::AlreadyCompleted(Box::new(existing)));
            }
        }

        // try_begin is the atomic gate; the status peek above only avoids a
        // repository round-trip on the common duplicate-poll path.
        let task = match self.tracker.try_begin(&key) {
            Ok(task) => task,
            Err(_) => {
                // Lost the race to a concurrent accept for the same key.
                let task = self
                    .tracker
                    .get(&key)
                    .unwrap_or_else(|| ReviewTask::new(key.clone()));
                return Ok(StartOutcome::AlreadyProcessing(task));
            }
        };

        let pipeline = Arc::clone(&self.pipeline);
        let span = tracing::info_span!(
            "review_run",
            subject_id = %key.subject_id(),
            object_id = %key.object_id(),
            force,
        );
        tokio::spawn(async move { pipeline.run(key).await }.instrument(span));

        Ok(StartOutcome::Started(task))
    }

    pub fn status(&self, key: &ReviewKey) -> Option<ReviewTask> {
        self.tracker.get(key)
    }

    pub async fn assessment(
        &self,
        key: &ReviewKey,
    ) -> Result<Option<Assessment>, AssessmentRepositoryError> {
        self.assessments.get(key).await
    }

    pub async fn list_for_subject(
        &self,
        subject_id: &str,
    ) -> Result<Vec<Assessment>, AssessmentRepositoryError> {
        self.assessments.list_for_subject(subject_id).await
    }

    /// Removes one review entirely: the tracker record and the persisted
    /// assessment.
    pub async fn evict(&self, key: &ReviewKey) -> Result<(), AssessmentRepositoryError> {
        self.tracker.evict(key);
        self.assessments.remove(key).await
    }

    /// Called when the underlying recording is deleted: drops every tracker
    /// record that refers to it.
    pub fn evict_object(&self, object_id: &str) {
        self.tracker.evict_object(object_id);
    }
}
