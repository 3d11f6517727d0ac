use async_trait::async_trait;

use crate::domain::{Assessment, ReviewKey};

/// Persistence for canonical assessments, keyed by (subject, recording).
/// Upsert carries replace semantics: a re-run overwrites, never appends.
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    async fn upsert(&self, assessment: &Assessment) -> Result<(), AssessmentRepositoryError>;

    async fn get(&self, key: &ReviewKey) -> Result<Option<Assessment>, AssessmentRepositoryError>;

    async fn list_for_subject(
        &self,
        subject_id: &str,
    ) -> Result<Vec<Assessment>, AssessmentRepositoryError>;

    async fn remove(&self, key: &ReviewKey) -> Result<(), AssessmentRepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentRepositoryError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}
