// ============================================================
// COLUMN CLASSIFIER
// ============================================================
// Heuristic column typing, kept isolated so it can be replaced with
// schema-driven typing without touching the query engine contract.
// Unclassified columns fall back to Text.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::cell::CellValue;
use crate::domain::dataset::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Date,
    Numeric,
    Text,
}

/// Rows sampled per column when guessing a type from values.
const SAMPLE_ROWS: usize = 25;

/// Classify one column from its name and a sample of its values.
pub fn classify_column(name: &str, rows: &[&Row]) -> ColumnKind {
    if normalize_name(name).contains("date") {
        return ColumnKind::Date;
    }

    let mut seen = 0usize;
    let mut dates = 0usize;
    let mut numbers = 0usize;

    for row in rows.iter().take(SAMPLE_ROWS) {
        let Some(value) = row.get(name) else { continue };
        if value.is_empty() {
            continue;
        }
        seen += 1;
        if parse_cell_date(value).is_some() {
            dates += 1;
        }
        if value.as_number().is_some() {
            numbers += 1;
        }
    }

    if seen == 0 {
        return ColumnKind::Text;
    }
    if dates * 2 >= seen && dates > 0 {
        ColumnKind::Date
    } else if numbers * 2 >= seen && numbers > 0 {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

/// First column of the row set that classifies as date-bearing, in
/// column order of the given row.
pub fn find_date_column(rows: &[&Row]) -> Option<String> {
    let first = rows.first()?;
    first
        .keys()
        .find(|name| classify_column(name, rows) == ColumnKind::Date)
        .cloned()
}

/// Parse a cell as a calendar date, trying the formats uploads
/// actually contain. Pure-numeric cells are not treated as dates.
pub fn parse_cell_date(value: &CellValue) -> Option<NaiveDate> {
    let text = match value {
        CellValue::Text(s) => s.trim(),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }

    // 2022-03-15T10:30:00 and friends
    if text.contains('T') {
        let head = text.get(..19).unwrap_or(text);
        if let Ok(dt) = NaiveDateTime::parse_from_str(head, "%Y-%m-%dT%H:%M:%S") {
            return Some(dt.date());
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(text, format) {
            return Some(d);
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }

    None
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
