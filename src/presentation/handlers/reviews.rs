use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::services::StartOutcome;
use crate::domain::{AnalysisReport, Assessment, ReviewKey, ReviewTask, TaskStatus};
use crate::presentation::state::AppState;

#[derive(Deserialize, Debug)]
pub struct StartParams {
    #[serde(default)]
    pub force: bool,
}

#[derive(Serialize)]
pub struct TaskStatusResponse {
    pub subject_id: String,
    pub object_id: String,
    pub status: String,
    pub progress: f32,
    pub message: String,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct AssessmentResponse {
    pub subject_id: String,
    pub object_id: String,
    pub transcript: String,
    pub model: String,
    pub analysis: AnalysisReport,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ReviewTask> for TaskStatusResponse {
    fn from(task: &ReviewTask) -> Self {
        Self {
            subject_id: task.key.subject_id().to_string(),
            object_id: task.key.object_id().to_string(),
            status: task.status.as_str().to_string(),
            progress: task.progress,
            message: task.message.clone(),
            started_at: task.started_at.to_rfc3339(),
            finished_at: task.finished_at.map(|t| t.to_rfc3339()),
            error: task.error.clone(),
        }
    }
}

impl From<Assessment> for AssessmentResponse {
    fn from(a: Assessment) -> Self {
        Self {
            subject_id: a.key.subject_id().to_string(),
            object_id: a.key.object_id().to_string(),
            transcript: a.transcript,
            model: a.model,
            analysis: a.report,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn start_review_handler(
    State(state): State<AppState>,
    Path((subject_id, object_id)): Path<(String, String)>,
    Query(params): Query<StartParams>,
) -> impl IntoResponse {
    let key = ReviewKey::new(subject_id, object_id);

    match state.analysis_service.start(key, params.force).await {
        Ok(StartOutcome::Started(task)) => {
            (StatusCode::ACCEPTED, Json(TaskStatusResponse::from(&task))).into_response()
        }
        Ok(StartOutcome::AlreadyProcessing(task)) => {
            (StatusCode::OK, Json(TaskStatusResponse::from(&task))).into_response()
        }
        Ok(StartOutcome::AlreadyCompleted(assessment)) => {
            (StatusCode::OK, Json(AssessmentResponse::from(*assessment))).into_response()
        }
        Ok(StartOutcome::PreviousRunFailed(task)) => {
            (StatusCode::CONFLICT, Json(TaskStatusResponse::from(&task))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to accept review request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to start review: {}", e),
                }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn review_status_handler(
    State(state): State<AppState>,
    Path((subject_id, object_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let key = ReviewKey::new(subject_id, object_id);

    match state.analysis_service.status(&key) {
        Some(task) => (StatusCode::OK, Json(TaskStatusResponse::from(&task))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("No review found for {}", key),
            }),
        )
            .into_response(),
    }
}

#[tracing::instrument(skip(state))]
pub async fn review_result_handler(
    State(state): State<AppState>,
    Path((subject_id, object_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let key = ReviewKey::new(subject_id, object_id);

    match state.analysis_service.assessment(&key).await {
        Ok(Some(assessment)) => {
            (StatusCode::OK, Json(AssessmentResponse::from(assessment))).into_response()
        }
        Ok(None) => match state.analysis_service.status(&key) {
            Some(task) if task.status == TaskStatus::Processing => {
                (StatusCode::ACCEPTED, Json(TaskStatusResponse::from(&task))).into_response()
            }
            _ => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("No assessment found for {}", key),
                }),
            )
                .into_response(),
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch assessment");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch assessment: {}", e),
                }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_reviews_handler(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> impl IntoResponse {
    match state.analysis_service.list_for_subject(&subject_id).await {
        Ok(assessments) => {
            let body: Vec<AssessmentResponse> =
                assessments.into_iter().map(AssessmentResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list assessments");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list assessments: {}", e),
                }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn delete_review_handler(
    State(state): State<AppState>,
    Path((subject_id, object_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let key = ReviewKey::new(subject_id, object_id);

    match state.analysis_service.evict(&key).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete review");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to delete review: {}", e),
                }),
            )
                .into_response()
        }
    }
}
