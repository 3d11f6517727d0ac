use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{AssessmentRepository, AssessmentRepositoryError};
use crate::domain::{AnalysisReport, Assessment, ReviewKey};

/// Assessments table keyed by the natural (subject_id, object_id) pair. The
/// upsert replaces the prior row, which is how a forced re-run overwrites its
/// predecessor. See migrations/0001_create_assessments.sql.
pub struct PgAssessmentRepository {
    pool: PgPool,
}

impl PgAssessmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssessmentRepository for PgAssessmentRepository {
    #[instrument(skip(self, assessment), fields(key = %assessment.key))]
    async fn upsert(&self, assessment: &Assessment) -> Result<(), AssessmentRepositoryError> {
        let analysis = serde_json::to_value(&assessment.report)
            .map_err(|e| AssessmentRepositoryError::QueryFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO assessments (subject_id, object_id, transcript, model, analysis, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (subject_id, object_id) DO UPDATE
            SET transcript = EXCLUDED.transcript,
                model = EXCLUDED.model,
                analysis = EXCLUDED.analysis,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(assessment.key.subject_id())
        .bind(assessment.key.object_id())
        .bind(&assessment.transcript)
        .bind(&assessment.model)
        .bind(&analysis)
        .bind(assessment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AssessmentRepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: &ReviewKey) -> Result<Option<Assessment>, AssessmentRepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT subject_id, object_id, transcript, model, analysis, created_at
            FROM assessments
            WHERE subject_id = $1 AND object_id = $2
            "#,
        )
        .bind(key.subject_id())
        .bind(key.object_id())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AssessmentRepositoryError::QueryFailed(e.to_string()))?;

        row.map(assessment_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_for_subject(
        &self,
        subject_id: &str,
    ) -> Result<Vec<Assessment>, AssessmentRepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT subject_id, object_id, transcript, model, analysis, created_at
            FROM assessments
            WHERE subject_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AssessmentRepositoryError::QueryFailed(e.to_string()))?;

        rows.into_iter().map(assessment_from_row).collect()
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn remove(&self, key: &ReviewKey) -> Result<(), AssessmentRepositoryError> {
        sqlx::query("DELETE FROM assessments WHERE subject_id = $1 AND object_id = $2")
            .bind(key.subject_id())
            .bind(key.object_id())
            .execute(&self.pool)
            .await
            .map_err(|e| AssessmentRepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}

fn assessment_from_row(row: sqlx::postgres::PgRow) -> Result<Assessment, AssessmentRepositoryError> {
    let subject_id: String = row
        .try_get("subject_id")
        .map_err(|e| AssessmentRepositoryError::CorruptRecord(e.to_string()))?;
    let object_id: String = row
        .try_get("object_id")
        .map_err(|e| AssessmentRepositoryError::CorruptRecord(e.to_string()))?;
    let transcript: String = row
        .try_get("transcript")
        .map_err(|e| AssessmentRepositoryError::CorruptRecord(e.to_string()))?;
    let model: String = row
        .try_get("model")
        .map_err(|e| AssessmentRepositoryError::CorruptRecord(e.to_string()))?;
    let analysis: serde_json::Value = row
        .try_get("analysis")
        .map_err(|e| AssessmentRepositoryError::CorruptRecord(e.to_string()))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| AssessmentRepositoryError::CorruptRecord(e.to_string()))?;

    let report: AnalysisReport = serde_json::from_value(analysis)
        .map_err(|e| AssessmentRepositoryError::CorruptRecord(e.to_string()))?;

    Ok(Assessment {
        key: ReviewKey::new(subject_id, object_id),
        transcript,
        model,
        report,
        created_at,
    })
}
