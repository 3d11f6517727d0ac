use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    delete_media_handler, delete_review_handler, health_handler, list_media_handler,
    list_reviews_handler, review_result_handler, review_status_handler, start_review_handler,
    upload_handler,
};
use crate::presentation::state::AppState;

/// Recordings come in whole; half an hour of video fits comfortably here.
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/upload", post(upload_handler))
        .route("/list", get(list_media_handler))
        .route("/media/{object_id}", delete(delete_media_handler))
        .route("/api/v1/reviews/{subject_id}", get(list_reviews_handler))
        .route(
            "/api/v1/reviews/{subject_id}/{object_id}",
            post(start_review_handler)
                .get(review_result_handler)
                .delete(delete_review_handler),
        )
        .route(
            "/api/v1/reviews/{subject_id}/{object_id}/status",
            get(review_status_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
