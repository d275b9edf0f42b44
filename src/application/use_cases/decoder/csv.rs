// ============================================================
// CSV PATH
// ============================================================
// Decode bytes as text, parse as delimited records with the first
// record as the header row, build one sheet named "Sheet1".

use csv::{ReaderBuilder, Trim};

use crate::domain::cell::CellValue;
use crate::domain::dataset::{Dataset, Row, Sheet, SourceFormat};
use crate::domain::error::{AppError, Result};
use crate::domain::upload::UploadedFile;

pub(super) fn decode_csv(file: &UploadedFile) -> Result<Dataset> {
    let content = decode_text(&file.bytes);
    let delimiter = detect_delimiter(&content);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .flexible(true) // allow rows with different lengths
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows: Vec<Row> = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
        })?;

        // A line of only delimiters/whitespace is not a data row.
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut row = Row::new();
        for (idx, header) in headers.iter().enumerate() {
            let value = record.get(idx).unwrap_or("");
            row.insert(header.clone(), CellValue::from_text(value));
        }
        rows.push(row);
    }

    let total_records = rows.len();

    Ok(Dataset {
        file_name: file.name.clone(),
        file_size: file.size,
        format: SourceFormat::Csv,
        sheets: vec![Sheet {
            name: "Sheet1".to_string(),
            headers,
            rows,
        }],
        total_records,
    })
}

/// Decode raw bytes to text: UTF-8 first, Windows-1252 as fallback.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (content, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            content.into_owned()
        }
    }
}

/// Detect delimiter from content (comma, semicolon, tab, pipe) by
/// scoring per-line counts for consistency and frequency.
pub fn detect_delimiter(content: &str) -> u8 {
    let candidates = [b',', b';', b'\t', b'|'];

    let mut best_delimiter = b',';
    let mut best_score = 0.0f32;

    for &delimiter in &candidates {
        let sample_lines: Vec<_> = content.lines().take(10).collect();

        if sample_lines.is_empty() {
            continue;
        }

        let mut field_counts = Vec::new();

        for line in &sample_lines {
            let count = line.bytes().filter(|&b| b == delimiter).count();
            field_counts.push(count);
        }

        if !field_counts.is_empty() {
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }
    }

    best_delimiter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_file(content: &str) -> UploadedFile {
        UploadedFile::new("test.csv", content.as_bytes().to_vec())
    }

    #[test]
    fn test_parse_simple_csv() {
        let dataset = decode_csv(&csv_file("name,age,city\nAlice,30,NYC\nBob,25,LA")).unwrap();

        assert_eq!(dataset.sheets.len(), 1);
        let sheet = &dataset.sheets[0];
        assert_eq!(sheet.name, "Sheet1");
        assert_eq!(sheet.headers, vec!["name", "age", "city"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(dataset.total_records, 2);
        assert_eq!(sheet.rows[0]["name"], CellValue::Text("Alice".to_string()));
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let dataset = decode_csv(&csv_file("name,dept\nJohn,Eng\n\n,\nJane,Sales\n")).unwrap();

        // only the two real data lines survive
        assert_eq!(dataset.total_records, 2);
        let sheet = &dataset.sheets[0];
        assert_eq!(sheet.rows[1]["name"], CellValue::Text("Jane".to_string()));
    }

    #[test]
    fn test_duplicate_headers_keep_later_value() {
        let dataset = decode_csv(&csv_file("Name,Name\nfirst,second\n")).unwrap();

        let sheet = &dataset.sheets[0];
        assert_eq!(sheet.headers, vec!["Name", "Name"]);
        assert_eq!(sheet.rows[0].len(), 1);
        assert_eq!(
            sheet.rows[0]["Name"],
            CellValue::Text("second".to_string())
        );
    }

    #[test]
    fn test_short_rows_pad_with_empty() {
        let dataset = decode_csv(&csv_file("a,b,c\n1,2\n")).unwrap();

        let row = &dataset.sheets[0].rows[0];
        assert_eq!(row["c"], CellValue::Empty);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(detect_delimiter("a|b|c\nd|e|f"), b'|');
    }

    #[test]
    fn test_semicolon_file_parses_with_detection() {
        let dataset = decode_csv(&csv_file("name;dept\nJohn;Eng\n")).unwrap();
        assert_eq!(dataset.sheets[0].headers, vec!["name", "dept"]);
        assert_eq!(
            dataset.sheets[0].rows[0]["dept"],
            CellValue::Text("Eng".to_string())
        );
    }

    #[test]
    fn test_non_utf8_bytes_fall_back_to_windows_1252() {
        let mut bytes = b"name\nJos".to_vec();
        bytes.push(0xE9); // é in Windows-1252
        let dataset = decode_csv(&UploadedFile::new("latin.csv", bytes)).unwrap();
        assert_eq!(
            dataset.sheets[0].rows[0]["name"],
            CellValue::Text("José".to_string())
        );
    }
}
