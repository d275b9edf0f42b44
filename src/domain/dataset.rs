// ============================================================
// DATASET TYPES
// ============================================================
// The normalized output of decoding one uploaded file: an ordered
// list of sheets, each a header list plus uniform row objects.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::cell::CellValue;
use super::error::{AppError, Result};

/// One decoded row: an ordered mapping from column name to cell value.
/// The key set is data-driven, computed from the sheet headers at
/// decode time.
pub type Row = IndexMap<String, CellValue>;

/// Detected source format of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Xlsx,
    Xls,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(SourceFormat::Csv),
            "xlsx" => Some(SourceFormat::Xlsx),
            "xls" => Some(SourceFormat::Xls),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Xlsx => "xlsx",
            SourceFormat::Xls => "xls",
        }
    }
}

/// One named table of rows sharing a column schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,

    /// Column names in source order. The decoder does not deduplicate;
    /// with duplicate headers the later column wins in each row map.
    pub headers: Vec<String>,

    pub rows: Vec<Row>,
}

/// Fill statistics for one sheet, as shown in the viewer sidebar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetStats {
    pub total_rows: usize,
    pub total_columns: usize,
    pub filled_cells: usize,
    pub empty_cells: usize,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn stats(&self) -> SheetStats {
        let mut filled = 0usize;
        let mut empty = 0usize;

        for row in &self.rows {
            for value in row.values() {
                if value.is_empty() {
                    empty += 1;
                } else {
                    filled += 1;
                }
            }
        }

        SheetStats {
            total_rows: self.rows.len(),
            total_columns: self.headers.len(),
            filled_cells: filled,
            empty_cells: empty,
        }
    }

    /// Replace a single cell. The edit is applied by swapping in a new
    /// merged row object so readers never observe a half-updated row.
    pub fn edit_cell(&mut self, row_index: usize, column: &str, value: CellValue) -> Result<()> {
        if !self.headers.iter().any(|h| h == column) {
            return Err(AppError::ValidationError(format!(
                "Unknown column: {}",
                column
            )));
        }

        let current = self.rows.get(row_index).ok_or_else(|| {
            AppError::NotFound(format!("Row index {} out of range", row_index))
        })?;

        let mut updated = current.clone();
        updated.insert(column.to_string(), value);
        self.rows[row_index] = updated;

        Ok(())
    }

    /// Delete rows by index. Indices outside the sheet are ignored.
    pub fn delete_rows(&mut self, indices: &[usize]) {
        let selected: std::collections::HashSet<usize> = indices.iter().copied().collect();
        let mut idx = 0usize;
        self.rows.retain(|_| {
            let keep = !selected.contains(&idx);
            idx += 1;
            keep
        });
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

/// The full decoded result of one uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub file_name: String,
    pub file_size: u64,
    pub format: SourceFormat,
    pub sheets: Vec<Sheet>,
    pub total_records: usize,
}

impl Dataset {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    /// Recompute `total_records` after row-level edits.
    pub fn refresh_totals(&mut self) {
        self.total_records = self.sheets.iter().map(|s| s.rows.len()).sum();
    }
}

#[cfg(test)]
pub(crate) fn row_from_pairs(pairs: &[(&str, CellValue)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
