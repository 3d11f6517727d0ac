use std::time::Duration;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Serialize;

use crate::presentation::state::AppState;

const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

#[derive(Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub stored_as: String,
    pub url: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let field = match multipart.next_field().await {
        Ok(Some(f)) => f,
        Ok(None) => {
            tracing::warn!("Upload request with no file");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No file uploaded".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read multipart: {}", e),
                }),
            )
                .into_response();
        }
    };

    let filename = sanitize_filename(field.file_name().unwrap_or("recording"));
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read file: {}", e),
                }),
            )
                .into_response();
        }
    };

    // Timestamp prefix keeps repeated uploads of the same filename distinct.
    let stored_as = format!("{}_{}", Utc::now().format("%Y%m%d-%H%M%S"), filename);

    tracing::debug!(filename = %filename, bytes = data.len(), stored_as = %stored_as, "Storing upload");

    if let Err(e) = state
        .media_store
        .upload(&stored_as, data, &content_type)
        .await
    {
        tracing::error!(error = %e, "Upload to media store failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Upload failed: {}", e),
            }),
        )
            .into_response();
    }

    let url = match state.media_store.signed_url(&stored_as, SIGNED_URL_TTL).await {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, "Could not sign URL for uploaded object");
            String::new()
        }
    };

    tracing::info!(stored_as = %stored_as, "Upload stored");

    (
        StatusCode::CREATED,
        Json(UploadResponse {
            filename,
            stored_as,
            url,
        }),
    )
        .into_response()
}

/// Keeps only the final path component of a client-supplied filename.
fn sanitize_filename(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or("recording")
        .to_string()
}
