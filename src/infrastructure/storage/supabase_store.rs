use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::application::ports::{MediaObject, MediaStore, MediaStoreError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Supabase Storage over its REST surface. Objects live in one bucket;
/// authentication is a service-role key sent as a bearer token.
pub struct SupabaseMediaStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

#[derive(Serialize)]
struct ListRequest {
    prefix: String,
    limit: usize,
}

#[derive(Deserialize)]
struct ListEntry {
    name: String,
    metadata: Option<ListEntryMetadata>,
}

#[derive(Deserialize)]
struct ListEntryMetadata {
    size: Option<u64>,
}

#[derive(Serialize)]
struct SignRequest {
    #[serde(rename = "expiresIn")]
    expires_in: u64,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl SupabaseMediaStore {
    pub fn new(
        base_url: String,
        api_key: String,
        bucket: String,
    ) -> Result<Self, MediaStoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MediaStoreError::UploadFailed(format!("client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            bucket,
        })
    }

    fn object_url(&self, object_id: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, object_id
        )
    }
}

#[async_trait]
impl MediaStore for SupabaseMediaStore {
    async fn download(&self, object_id: &str) -> Result<Vec<u8>, MediaStoreError> {
        let response = self
            .client
            .get(self.object_url(object_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| MediaStoreError::DownloadFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MediaStoreError::NotFound(object_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(MediaStoreError::DownloadFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MediaStoreError::DownloadFailed(e.to_string()))?;

        tracing::debug!(object_id, bytes = bytes.len(), "Recording downloaded");

        Ok(bytes.to_vec())
    }

    async fn upload(
        &self,
        object_id: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), MediaStoreError> {
        let response = self
            .client
            .post(self.object_url(object_id))
            .bearer_auth(&self.api_key)
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(data)
            .send()
            .await
            .map_err(|e| MediaStoreError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MediaStoreError::UploadFailed(format!(
                "status {status}: {body}"
            )));
        }

        Ok(())
    }

    async fn remove(&self, object_id: &str) -> Result<(), MediaStoreError> {
        let response = self
            .client
            .delete(self.object_url(object_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| MediaStoreError::DeleteFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MediaStoreError::NotFound(object_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(MediaStoreError::DeleteFailed(format!(
                "status {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn list(&self) -> Result<Vec<MediaObject>, MediaStoreError> {
        let url = format!("{}/storage/v1/object/list/{}", self.base_url, self.bucket);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&ListRequest {
                prefix: String::new(),
                limit: 1000,
            })
            .send()
            .await
            .map_err(|e| MediaStoreError::ListFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaStoreError::ListFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let entries: Vec<ListEntry> = response
            .json()
            .await
            .map_err(|e| MediaStoreError::ListFailed(e.to_string()))?;

        Ok(entries
            .into_iter()
            .map(|e| MediaObject {
                name: e.name,
                size_bytes: e.metadata.and_then(|m| m.size),
            })
            .collect())
    }

    async fn signed_url(&self, object_id: &str, ttl: Duration) -> Result<String, MediaStoreError> {
        let url = format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.base_url, self.bucket, object_id
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&SignRequest {
                expires_in: ttl.as_secs(),
            })
            .send()
            .await
            .map_err(|e| MediaStoreError::SignFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MediaStoreError::NotFound(object_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(MediaStoreError::SignFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let signed: SignResponse = response
            .json()
            .await
            .map_err(|e| MediaStoreError::SignFailed(e.to_string()))?;

        Ok(format!(
            "{}/storage/v1{}",
            self.base_url,
            signed.signed_url.trim_start_matches("/storage/v1")
        ))
    }
}
