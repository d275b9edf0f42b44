// Export download boundary. The core hands the artifact over and
// has no visibility into whether the save succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::error::{AppError, Result};
use crate::domain::export::ExportArtifact;

pub trait DownloadSink: Send + Sync {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf>;
}

/// Writes artifacts into a downloads directory.
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            AppError::StorageError(format!(
                "Failed to create download dir {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }
}

impl DownloadSink for FileDownloadSink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf> {
        let path = self.dir.join(&artifact.suggested_filename);
        fs::write(&path, &artifact.content)
            .map_err(|e| AppError::IoError(format!("Failed to write download: {}", e)))?;

        info!(
            file = %path.display(),
            mime = %artifact.mime_type,
            bytes = artifact.estimated_size(),
            "Export delivered"
        );

        Ok(path)
    }
}
