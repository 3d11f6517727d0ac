use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{MediaStore, MediaStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::local_store::LocalMediaStore;
use super::supabase_store::SupabaseMediaStore;

pub struct MediaStoreFactory;

impl MediaStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn MediaStore>, MediaStoreError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let path = PathBuf::from(&settings.local_path);
                let store = LocalMediaStore::new(path)?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Supabase => {
                let base_url = settings.supabase_url.as_deref().ok_or_else(|| {
                    MediaStoreError::UploadFailed("supabase_url required".into())
                })?;
                let api_key = settings.supabase_key.as_deref().ok_or_else(|| {
                    MediaStoreError::UploadFailed("supabase_key required".into())
                })?;
                let store = SupabaseMediaStore::new(
                    base_url.to_string(),
                    api_key.to_string(),
                    settings.bucket.clone(),
                )?;
                Ok(Arc::new(store))
            }
        }
    }
}
