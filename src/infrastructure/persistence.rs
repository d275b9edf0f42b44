// ============================================================
// DATASET STORE
// ============================================================
// Persistence collaborator for uploaded files. The core only needs
// create/list semantics with server-assigned timestamps; the far side
// could be a database, flat files, or a remote bucket.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domain::dataset::SourceFormat;
use crate::domain::error::{AppError, Result};

/// Metadata captured alongside the stored blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub name: String,
    pub size: u64,
    pub format: SourceFormat,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDataset {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    pub size: u64,
    pub format: SourceFormat,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait DatasetStore: Send + Sync {
    async fn store_dataset(&self, bytes: &[u8], meta: &DatasetMeta) -> Result<StoredDataset>;

    /// All stored records, newest first.
    async fn list_datasets(&self) -> Result<Vec<DatasetRecord>>;
}

/// Filesystem-backed store: one blob plus one JSON metadata sidecar
/// per dataset.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root).map_err(|e| {
            AppError::StorageError(format!(
                "Failed to create store dir {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }
}

#[async_trait]
impl DatasetStore for FileStore {
    async fn store_dataset(&self, bytes: &[u8], meta: &DatasetMeta) -> Result<StoredDataset> {
        let id = Uuid::new_v4().to_string();
        let blob_path = self.root.join(format!("{}.bin", id));
        let meta_path = self.root.join(format!("{}.json", id));

        tokio::fs::write(&blob_path, bytes).await.map_err(|e| {
            AppError::StorageError(format!("Failed to write dataset blob: {}", e))
        })?;

        let record = DatasetRecord {
            id: id.clone(),
            name: meta.name.clone(),
            url: format!("file://{}", blob_path.display()),
            size: meta.size,
            format: meta.format,
            created_at: Utc::now(),
        };

        let encoded = serde_json::to_string_pretty(&record).map_err(|e| {
            AppError::StorageError(format!("Failed to encode dataset metadata: {}", e))
        })?;
        tokio::fs::write(&meta_path, encoded).await.map_err(|e| {
            AppError::StorageError(format!("Failed to write dataset metadata: {}", e))
        })?;

        info!(id = %record.id, name = %record.name, size = record.size, "Stored dataset");

        Ok(StoredDataset {
            id: record.id,
            url: record.url,
        })
    }

    async fn list_datasets(&self) -> Result<Vec<DatasetRecord>> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| AppError::StorageError(format!("Failed to read store dir: {}", e)))?;

        let mut records = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::StorageError(format!("Failed to read store dir: {}", e)))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
                AppError::StorageError(format!("Failed to read metadata {}: {}", path.display(), e))
            })?;
            let record: DatasetRecord = serde_json::from_str(&raw).map_err(|e| {
                AppError::StorageError(format!(
                    "Corrupt metadata {}: {}",
                    path.display(),
                    e
                ))
            })?;
            records.push(record);
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}
