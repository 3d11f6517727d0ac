use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

/// Listing entry for a stored recording.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaObject {
    pub name: String,
    pub size_bytes: Option<u64>,
}

/// Binary object store holding the uploaded recordings. The pipeline only
/// ever downloads; upload/list/remove back the HTTP surface.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn download(&self, object_id: &str) -> Result<Vec<u8>, MediaStoreError>;

    async fn upload(
        &self,
        object_id: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), MediaStoreError>;

    async fn remove(&self, object_id: &str) -> Result<(), MediaStoreError>;

    async fn list(&self) -> Result<Vec<MediaObject>, MediaStoreError>;

    async fn signed_url(&self, object_id: &str, ttl: Duration) -> Result<String, MediaStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaStoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("listing failed: {0}")]
    ListFailed(String),
    #[error("signing failed: {0}")]
    SignFailed(String),
}
