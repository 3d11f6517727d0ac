use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{MediaObject, MediaStore, MediaStoreError};

/// Filesystem-backed store for local development and tests.
pub struct LocalMediaStore {
    inner: Arc<LocalFileSystem>,
    base_path: PathBuf,
}

impl LocalMediaStore {
    pub fn new(base_path: PathBuf) -> Result<Self, MediaStoreError> {
        std::fs::create_dir_all(&base_path)
            .map_err(|e| MediaStoreError::UploadFailed(e.to_string()))?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| MediaStoreError::UploadFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            base_path,
        })
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn download(&self, object_id: &str) -> Result<Vec<u8>, MediaStoreError> {
        let path = StorePath::from(object_id);
        let result = self
            .inner
            .get(&path)
            .await
            .map_err(|e| MediaStoreError::NotFound(e.to_string()))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| MediaStoreError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn upload(
        &self,
        object_id: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<(), MediaStoreError> {
        let path = StorePath::from(object_id);
        self.inner
            .put(&path, PutPayload::from(data))
            .await
            .map_err(|e| MediaStoreError::UploadFailed(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, object_id: &str) -> Result<(), MediaStoreError> {
        let path = StorePath::from(object_id);
        self.inner
            .delete(&path)
            .await
            .map_err(|e| MediaStoreError::DeleteFailed(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<MediaObject>, MediaStoreError> {
        let entries: Vec<_> = self
            .inner
            .list(None)
            .try_collect()
            .await
            .map_err(|e| MediaStoreError::ListFailed(e.to_string()))?;

        Ok(entries
            .into_iter()
            .map(|meta| MediaObject {
                name: meta.location.to_string(),
                size_bytes: Some(meta.size),
            })
            .collect())
    }

    async fn signed_url(
        &self,
        object_id: &str,
        _ttl: Duration,
    ) -> Result<String, MediaStoreError> {
        // No signing for plain files; hand back a file URL so callers still
        // get something dereferenceable on the host.
        Ok(format!(
            "file://{}",
            self.base_path.join(object_id).display()
        ))
    }
}
