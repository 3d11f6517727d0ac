use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::application::ports::{AssessmentRepository, AssessmentRepositoryError};
use crate::domain::{Assessment, ReviewKey};

/// Map-backed repository for local development and tests. Contents vanish
/// with the process.
pub struct InMemoryAssessmentRepository {
    records: RwLock<HashMap<ReviewKey, Assessment>>,
}

impl InMemoryAssessmentRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryAssessmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryAssessmentRepository {
    async fn upsert(&self, assessment: &Assessment) -> Result<(), AssessmentRepositoryError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.insert(assessment.key.clone(), assessment.clone());
        Ok(())
    }

    async fn get(&self, key: &ReviewKey) -> Result<Option<Assessment>, AssessmentRepositoryError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(key).cloned())
    }

    async fn list_for_subject(
        &self,
        subject_id: &str,
    ) -> Result<Vec<Assessment>, AssessmentRepositoryError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        let mut matches: Vec<Assessment> = records
            .values()
            .filter(|a| a.key.subject_id() == subject_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn remove(&self, key: &ReviewKey) -> Result<(), AssessmentRepositoryError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.remove(key);
        Ok(())
    }
}
