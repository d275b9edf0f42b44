// ============================================================
// UPLOAD PIPELINE
// ============================================================
// Multi-file batch ingestion: validate, decode, persist, cache. Each
// file is processed independently; one failure never aborts the batch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::domain::dataset::Dataset;
use crate::domain::upload::{UploadReport, UploadStats, UploadStatus, UploadedFile};
use crate::infrastructure::client::BackendClient;
use crate::infrastructure::persistence::{DatasetMeta, DatasetStore};
use crate::infrastructure::session_cache::KvCache;

use super::decoder::SpreadsheetDecoder;
use super::file_validator::FileValidator;

/// Cache key for the decoded datasets of recent uploads.
pub const RECENT_FILES_KEY: &str = "recent_files";

/// Session-cache entry for one processed upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedUpload {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub records: usize,
    pub dataset: Dataset,
}

pub struct UploadPipeline {
    validator: FileValidator,
    decoder: SpreadsheetDecoder,
    store: Arc<dyn DatasetStore>,
    cache: Arc<dyn KvCache>,
}

impl UploadPipeline {
    pub fn new(store: Arc<dyn DatasetStore>, cache: Arc<dyn KvCache>) -> Self {
        Self {
            validator: FileValidator::new(),
            decoder: SpreadsheetDecoder::new(),
            store,
            cache,
        }
    }

    /// Build a pipeline over the process-wide backend client, taking
    /// the upload ceiling from its configuration.
    pub fn from_client(client: &BackendClient) -> Self {
        Self::new(client.store(), client.cache()).with_validator(
            FileValidator::new().with_max_size(client.config().max_upload_bytes),
        )
    }

    pub fn with_validator(mut self, validator: FileValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Process a batch of uploads. Failures are isolated per file and
    /// attached to its status record.
    pub async fn ingest_batch(&self, files: Vec<UploadedFile>) -> Vec<UploadReport> {
        let mut reports = Vec::with_capacity(files.len());
        for file in files {
            reports.push(self.ingest_file(file).await);
        }
        reports
    }

    async fn ingest_file(&self, file: UploadedFile) -> UploadReport {
        let file_name = file.name.clone();
        let file_size = file.size;

        let validation = self.validator.validate(&file);
        if !validation.is_valid {
            warn!(file = %file_name, errors = validation.errors.len(), "Upload rejected");
            return UploadReport {
                file_name,
                file_size,
                status: UploadStatus::Rejected {
                    errors: validation.errors,
                },
            };
        }

        let dataset = match self.decoder.decode(&file).await {
            Ok(dataset) => dataset,
            Err(err) => {
                error!(file = %file_name, error = %err, "Failed to process upload");
                return UploadReport {
                    file_name,
                    file_size,
                    status: UploadStatus::Failed {
                        error: err.to_string(),
                    },
                };
            }
        };

        let meta = DatasetMeta {
            name: file_name.clone(),
            size: file_size,
            format: dataset.format,
            records: dataset.total_records,
        };

        let stored = match self.store.store_dataset(&file.bytes, &meta).await {
            Ok(stored) => stored,
            Err(err) => {
                error!(file = %file_name, error = %err, "Failed to persist upload");
                return UploadReport {
                    file_name,
                    file_size,
                    status: UploadStatus::Failed {
                        error: err.to_string(),
                    },
                };
            }
        };

        let records = dataset.total_records;
        let sheets = dataset.sheets.len();

        self.remember_upload(&stored.id, dataset);

        info!(file = %file_name, records, sheets, "Upload processed");

        UploadReport {
            file_name,
            file_size,
            status: UploadStatus::Processed {
                records,
                sheets,
                dataset_id: stored.id,
            },
        }
    }

    /// Prepend the decoded dataset to the session cache so the viewer
    /// can reopen it after a reload. Cache trouble is logged, not fatal.
    fn remember_upload(&self, id: &str, dataset: Dataset) {
        let mut entries: Vec<CachedUpload> = self
            .cache
            .get(RECENT_FILES_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        entries.insert(
            0,
            CachedUpload {
                id: id.to_string(),
                name: dataset.file_name.clone(),
                size: dataset.file_size,
                records: dataset.total_records,
                dataset,
            },
        );

        match serde_json::to_string(&entries) {
            Ok(encoded) => {
                if let Err(err) = self.cache.set(RECENT_FILES_KEY, &encoded) {
                    warn!(error = %err, "Failed to cache recent uploads");
                }
            }
            Err(err) => warn!(error = %err, "Failed to encode recent uploads"),
        }
    }

    /// Decoded datasets of recent uploads, newest first.
    pub fn recent_uploads(&self) -> Vec<CachedUpload> {
        self.cache
            .get(RECENT_FILES_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Aggregate counters for the dashboard sidebar. Rejected and
    /// failed files count toward totals but contribute no records.
    pub fn upload_stats(reports: &[UploadReport]) -> UploadStats {
        let mut stats = UploadStats::default();
        for report in reports {
            stats.total_files += 1;
            stats.storage_used += report.file_size;
            if let UploadStatus::Processed { records, .. } = &report.status {
                stats.total_records += records;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::FileStore;
    use crate::infrastructure::session_cache::FileKvCache;

    fn pipeline(dir: &std::path::Path) -> UploadPipeline {
        let store = Arc::new(FileStore::new(&dir.join("datasets")).unwrap());
        let cache = Arc::new(FileKvCache::new(&dir.join("cache")).unwrap());
        UploadPipeline::new(store, cache)
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path());

        let files = vec![
            UploadedFile::new("good.csv", b"name,dept\nJohn,Eng\nJane,Sales\n".to_vec()),
            UploadedFile::new("bad.pdf", b"%PDF".to_vec()),
            UploadedFile::new("corrupt.xlsx", vec![0x00, 0x01, 0x02]),
        ];

        let reports = pipeline.ingest_batch(files).await;
        assert_eq!(reports.len(), 3);

        match &reports[0].status {
            UploadStatus::Processed {
                records, sheets, ..
            } => {
                assert_eq!(*records, 2);
                assert_eq!(*sheets, 1);
            }
            other => panic!("expected processed, got {:?}", other),
        }

        assert!(matches!(reports[1].status, UploadStatus::Rejected { .. }));
        assert!(matches!(reports[2].status, UploadStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_processed_uploads_are_persisted_and_cached() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path());

        let reports = pipeline
            .ingest_batch(vec![UploadedFile::new(
                "people.csv",
                b"name\nJohn\n".to_vec(),
            )])
            .await;
        assert!(matches!(reports[0].status, UploadStatus::Processed { .. }));

        let stored = pipeline.store.list_datasets().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "people.csv");

        let cached = pipeline.recent_uploads();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].dataset.total_records, 1);
    }

    #[tokio::test]
    async fn test_newest_upload_is_first_in_cache() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path());

        pipeline
            .ingest_batch(vec![
                UploadedFile::new("first.csv", b"a\n1\n".to_vec()),
                UploadedFile::new("second.csv", b"a\n2\n".to_vec()),
            ])
            .await;

        let cached = pipeline.recent_uploads();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].name, "second.csv");
    }

    #[test]
    fn test_upload_stats_aggregate() {
        let reports = vec![
            UploadReport {
                file_name: "a.csv".to_string(),
                file_size: 100,
                status: UploadStatus::Processed {
                    records: 5,
                    sheets: 1,
                    dataset_id: "x".to_string(),
                },
            },
            UploadReport {
                file_name: "b.pdf".to_string(),
                file_size: 50,
                status: UploadStatus::Rejected {
                    errors: vec!["nope".to_string()],
                },
            },
        ];

        let stats = UploadPipeline::upload_stats(&reports);
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_records, 5);
        assert_eq!(stats.storage_used, 150);
    }
}
