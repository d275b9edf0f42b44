// ============================================================
// SPREADSHEET DECODER
// ============================================================
// Turns a raw uploaded file (CSV or Excel binary) into a normalized
// dataset of named sheets.

use std::path::Path;

use tracing::info;

use crate::domain::dataset::{Dataset, SourceFormat};
use crate::domain::error::{AppError, Result};
use crate::domain::upload::UploadedFile;

mod csv;
mod workbook;

pub use csv::detect_delimiter;

pub struct SpreadsheetDecoder;

impl Default for SpreadsheetDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpreadsheetDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Read a file from disk and decode it. The byte read is the one
    /// asynchronous boundary of the ingestion pipeline.
    pub async fn decode_path(&self, path: &Path) -> Result<Dataset> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::ValidationError("Invalid file name".to_string()))?
            .to_string();

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::IoError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        self.decode(&UploadedFile::new(&name, bytes)).await
    }

    /// Decode an in-memory upload. Fails with a `ValidationError` when
    /// an unsupported extension reaches this stage and a `ParseError`
    /// when the payload cannot be parsed.
    pub async fn decode(&self, file: &UploadedFile) -> Result<Dataset> {
        let extension = file.extension();
        let format = SourceFormat::from_extension(&extension).ok_or_else(|| {
            AppError::ValidationError(format!("Unsupported file format: {}", extension))
        })?;

        let dataset = match format {
            SourceFormat::Csv => csv::decode_csv(file)?,
            SourceFormat::Xlsx | SourceFormat::Xls => workbook::decode_workbook(file, format)?,
        };

        info!(
            file = %dataset.file_name,
            sheets = dataset.sheets.len(),
            records = dataset.total_records,
            "Decoded spreadsheet"
        );

        Ok(dataset)
    }
}
