// Key-value string store used for session continuity: the last
// decoded dataset and recent query history survive reloads here.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::error::{AppError, Result};

pub trait KvCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// One file per key under a cache directory.
pub struct FileKvCache {
    dir: PathBuf,
}

impl FileKvCache {
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            AppError::StorageError(format!(
                "Failed to create cache dir {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KvCache for FileKvCache {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(key, error = %err, "Failed to read cache entry");
                }
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.path_for(key), value)
            .map_err(|e| AppError::StorageError(format!("Failed to write cache entry: {}", e)))
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::StorageError(format!(
                "Failed to remove cache entry: {}",
                err
            ))),
        }
    }
}

/// Keep keys filesystem-safe: alphanumerics survive, everything else
/// collapses to underscores.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
