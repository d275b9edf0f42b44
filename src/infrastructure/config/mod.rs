use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Configuration for the backend client: where blobs, cache entries
/// and downloads live, and the upload admission ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub storage_root: PathBuf,
    pub cache_dir: PathBuf,
    pub download_dir: PathBuf,

    /// Logical collection name used by the persistence collaborator.
    pub collection: String,

    pub max_upload_bytes: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("data/datasets"),
            cache_dir: PathBuf::from("data/cache"),
            download_dir: PathBuf::from("data/downloads"),
            collection: "datasets".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl BackendConfig {
    /// Merge defaults, `Sheetscope.toml` and `SHEETSCOPE_*` env vars.
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(BackendConfig::default()))
            .merge(Toml::file("Sheetscope.toml"))
            .merge(Env::prefixed("SHEETSCOPE_"))
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.collection, "datasets");
    }

    #[test]
    fn test_load_without_sources_yields_defaults() {
        let config = BackendConfig::load().unwrap();
        assert_eq!(config.collection, "datasets");
    }
}
