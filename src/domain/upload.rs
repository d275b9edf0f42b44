use serde::{Deserialize, Serialize};

/// A file as received from the upload boundary. Transient: exists only
/// during validation and decoding.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            size: bytes.len() as u64,
            bytes,
        }
    }

    /// Extension taken after the final `.`, lowercased. A name without
    /// a dot yields the whole name, matching the upload form behavior.
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// Outcome of the pre-ingestion gate. Errors are advisory strings for
/// display; the caller decides whether to proceed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Per-file outcome of a batch upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UploadStatus {
    Processed {
        records: usize,
        sheets: usize,
        dataset_id: String,
    },
    Rejected {
        errors: Vec<String>,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReport {
    pub file_name: String,
    pub file_size: u64,
    #[serde(flatten)]
    pub status: UploadStatus,
}

/// Aggregate counters for the dashboard sidebar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadStats {
    pub total_files: usize,
    pub total_records: usize,
    pub storage_used: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_after_final_dot() {
        assert_eq!(UploadedFile::new("report.v2.XLSX", vec![]).extension(), "xlsx");
        assert_eq!(UploadedFile::new("data.csv", vec![]).extension(), "csv");
        assert_eq!(UploadedFile::new("noext", vec![]).extension(), "noext");
    }

    #[test]
    fn test_size_tracks_bytes() {
        let file = UploadedFile::new("a.csv", vec![0u8; 16]);
        assert_eq!(file.size, 16);
    }
}
