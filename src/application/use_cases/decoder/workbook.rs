// ============================================================
// WORKBOOK PATH
// ============================================================
// Parse xlsx/xls bytes with calamine; every worksheet becomes a sheet
// with the first raw row as headers.

use std::io::Cursor;

use calamine::{Data, Reader, Xls, Xlsx};

use crate::domain::cell::CellValue;
use crate::domain::dataset::{Dataset, Row, Sheet, SourceFormat};
use crate::domain::error::{AppError, Result};
use crate::domain::upload::UploadedFile;

pub(super) fn decode_workbook(file: &UploadedFile, format: SourceFormat) -> Result<Dataset> {
    let cursor = Cursor::new(file.bytes.as_slice());

    let worksheets = match format {
        SourceFormat::Xlsx => {
            let mut workbook: Xlsx<_> = Xlsx::new(cursor)
                .map_err(|e| AppError::ParseError(format!("Failed to open workbook: {}", e)))?;
            workbook.worksheets()
        }
        SourceFormat::Xls => {
            let mut workbook: Xls<_> = Xls::new(cursor)
                .map_err(|e| AppError::ParseError(format!("Failed to open workbook: {}", e)))?;
            workbook.worksheets()
        }
        SourceFormat::Csv => {
            return Err(AppError::Internal(
                "CSV input routed to the workbook decoder".to_string(),
            ))
        }
    };

    let mut sheets = Vec::new();
    let mut total_records = 0usize;

    for (name, range) in &worksheets {
        // A worksheet without any raw rows contributes nothing.
        if let Some(sheet) = sheet_from_rows(name, range.rows()) {
            total_records += sheet.rows.len();
            sheets.push(sheet);
        }
    }

    Ok(Dataset {
        file_name: file.name.clone(),
        file_size: file.size,
        format,
        sheets,
        total_records,
    })
}

/// Normalize raw worksheet rows: first row becomes the header list,
/// fully-empty rows are dropped, short rows are padded with `Empty`.
/// Duplicate headers are not deduplicated; the later column wins.
fn sheet_from_rows<'a, I>(name: &str, mut raw_rows: I) -> Option<Sheet>
where
    I: Iterator<Item = &'a [Data]>,
{
    let header_row = raw_rows.next()?;
    let headers: Vec<String> = header_row.iter().map(header_label).collect();

    let mut rows: Vec<Row> = Vec::new();

    for raw in raw_rows {
        let cells: Vec<CellValue> = raw.iter().map(cell_value).collect();
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }

        let mut row = Row::new();
        for (idx, header) in headers.iter().enumerate() {
            row.insert(
                header.clone(),
                cells.get(idx).cloned().unwrap_or(CellValue::Empty),
            );
        }
        rows.push(row);
    }

    Some(Sheet {
        name: name.to_string(),
        headers,
        rows,
    })
}

fn header_label(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        other => CellValue::from_text(&other.to_string()),
    }
}
