// ============================================================
// BACKEND CLIENT
// ============================================================
// One process-wide client constructed at startup and passed by
// reference to the ingestion and persistence collaborators. Never
// re-constructed per call.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::domain::error::{AppError, Result};

use super::config::BackendConfig;
use super::download::{DownloadSink, FileDownloadSink};
use super::persistence::{DatasetStore, FileStore};
use super::session_cache::{FileKvCache, KvCache};

static CLIENT: OnceCell<BackendClient> = OnceCell::new();

pub struct BackendClient {
    config: BackendConfig,
    store: Arc<FileStore>,
    cache: Arc<FileKvCache>,
    downloads: Arc<FileDownloadSink>,
}

impl BackendClient {
    /// Construct the global client. Calling this twice is an error.
    pub fn init(config: BackendConfig) -> Result<&'static BackendClient> {
        let client = BackendClient::build(config)?;

        CLIENT
            .set(client)
            .map_err(|_| AppError::Internal("Backend client already initialized".to_string()))?;

        let client = CLIENT.get().ok_or_else(|| {
            AppError::Internal("Backend client missing after init".to_string())
        })?;

        info!(
            storage_root = %client.config.storage_root.display(),
            collection = %client.config.collection,
            "Backend client initialized"
        );

        Ok(client)
    }

    /// Access the global client initialized by `init`.
    pub fn get() -> Result<&'static BackendClient> {
        CLIENT.get().ok_or_else(|| {
            AppError::Internal("Backend client not initialized; call init() first".to_string())
        })
    }

    fn build(config: BackendConfig) -> Result<Self> {
        let store = Arc::new(FileStore::new(&config.storage_root)?);
        let cache = Arc::new(FileKvCache::new(&config.cache_dir)?);
        let downloads = Arc::new(FileDownloadSink::new(&config.download_dir)?);

        Ok(Self {
            config,
            store,
            cache,
            downloads,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn DatasetStore> {
        self.store.clone()
    }

    pub fn cache(&self) -> Arc<dyn KvCache> {
        self.cache.clone()
    }

    pub fn downloads(&self) -> Arc<dyn DownloadSink> {
        self.downloads.clone()
    }
}
