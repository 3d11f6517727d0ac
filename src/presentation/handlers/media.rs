use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

#[derive(Serialize)]
pub struct MediaListResponse {
    pub files: Vec<MediaEntry>,
}

#[derive(Serialize)]
pub struct MediaEntry {
    pub filename: String,
    pub url: String,
    pub size_bytes: Option<u64>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state))]
pub async fn list_media_handler(State(state): State<AppState>) -> impl IntoResponse {
    let objects = match state.media_store.list().await {
        Ok(objects) => objects,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list media objects");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Listing failed: {}", e),
                }),
            )
                .into_response();
        }
    };

    let mut files = Vec::with_capacity(objects.len());
    for object in objects {
        let url = state
            .media_store
            .signed_url(&object.name, SIGNED_URL_TTL)
            .await
            .unwrap_or_default();
        files.push(MediaEntry {
            filename: object.name,
            url,
            size_bytes: object.size_bytes,
        });
    }

    (StatusCode::OK, Json(MediaListResponse { files })).into_response()
}

#[tracing::instrument(skip(state))]
pub async fn delete_media_handler(
    State(state): State<AppState>,
    Path(object_id): Path<String>,
) -> impl IntoResponse {
    if let Err(e) = state.media_store.remove(&object_id).await {
        tracing::error!(error = %e, "Failed to delete media object");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Delete failed: {}", e),
            }),
        )
            .into_response();
    }

    // A recording that no longer exists keeps no task records around.
    state.analysis_service.evict_object(&object_id);

    tracing::info!(object_id = %object_id, "Media object deleted");

    StatusCode::NO_CONTENT.into_response()
}
