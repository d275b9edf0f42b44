// ============================================================
// FILE VALIDATOR
// ============================================================
// Pre-ingestion gate: extension, size and name checks. Violations
// accumulate; nothing short-circuits.

use crate::domain::upload::{FileValidation, UploadedFile};

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const SUPPORTED_FORMATS: [&str; 3] = ["xlsx", "xls", "csv"];

pub struct FileValidator {
    max_size: u64,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self {
            max_size: MAX_UPLOAD_BYTES,
        }
    }
}

impl FileValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the size ceiling (e.g. from the backend config).
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn validate(&self, file: &UploadedFile) -> FileValidation {
        let mut errors = Vec::new();

        let extension = file.extension();
        if !SUPPORTED_FORMATS.contains(&extension.as_str()) {
            errors.push(format!(
                "Unsupported file format. Supported formats: {}",
                SUPPORTED_FORMATS.join(", ")
            ));
        }

        if file.size > self.max_size {
            errors.push("File size exceeds 10MB limit".to_string());
        }

        if file.name.trim().is_empty() {
            errors.push("Invalid file name".to_string());
        }

        FileValidation {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}
