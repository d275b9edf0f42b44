// ============================================================
// EXPORT SERIALIZER
// ============================================================
// Turns a (sub)set of rows plus a field selection into a downloadable
// artifact: CSV, JSON, or a textual workbook preview.

use serde_json::{Map, Value};
use tracing::info;

use crate::application::use_cases::column_classifier::parse_cell_date;
use crate::domain::cell::CellValue;
use crate::domain::dataset::Row;
use crate::domain::error::{AppError, Result};
use crate::domain::export::{
    ExportArtifact, ExportFormat, ExportRange, ExportSettings, ExportSpec,
};

pub struct ExportSerializer;

impl Default for ExportSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportSerializer {
    pub fn new() -> Self {
        Self
    }

    pub fn serialize(&self, rows: &[&Row], spec: &ExportSpec) -> Result<ExportArtifact> {
        let window = apply_range(rows, &spec.range);

        let content = match spec.format {
            ExportFormat::Csv => self.to_csv(&window, spec),
            ExportFormat::Json => self.to_json(&window, spec)?,
            ExportFormat::ExcelPreview => self.to_preview(&window, spec),
        };

        let artifact = ExportArtifact {
            content,
            mime_type: spec.format.mime_type().to_string(),
            suggested_filename: build_filename(spec),
        };

        info!(
            format = spec.format.extension(),
            records = window.len(),
            bytes = artifact.estimated_size(),
            "Export serialized"
        );

        Ok(artifact)
    }

    /// Header line of field labels, then one line per row with every
    /// value wrapped in the text qualifier. Empty cells render as an
    /// empty string between qualifiers.
    fn to_csv(&self, rows: &[&Row], spec: &ExportSpec) -> String {
        let settings = &spec.settings;
        let delimiter = settings.delimiter.to_string();
        let qualifier = settings.text_qualifier;

        let mut lines = Vec::with_capacity(rows.len() + 1);

        if settings.include_headers {
            lines.push(spec.fields.join(&delimiter));
        }

        for row in rows {
            let line = spec
                .fields
                .iter()
                .map(|field| {
                    let rendered = render_cell(row.get(field), settings);
                    format!("{}{}{}", qualifier, rendered, qualifier)
                })
                .collect::<Vec<_>>()
                .join(&delimiter);
            lines.push(line);
        }

        lines.join("\n")
    }

    /// Field-projected row objects, preserving field order from the
    /// spec. A field absent from a row is omitted, not defaulted.
    fn to_json(&self, rows: &[&Row], spec: &ExportSpec) -> Result<String> {
        let projected: Vec<Value> = rows
            .iter()
            .map(|row| {
                let mut object = Map::new();
                for field in &spec.fields {
                    if let Some(cell) = row.get(field) {
                        object.insert(field.clone(), cell_to_json(cell, &spec.settings));
                    }
                }
                Value::Object(object)
            })
            .collect();

        let serialized = if spec.settings.pretty_print {
            serde_json::to_string_pretty(&projected)
        } else {
            serde_json::to_string(&projected)
        };

        serialized.map_err(|e| AppError::Internal(format!("Failed to serialize export: {}", e)))
    }

    /// Non-binary placeholder for workbook export.
    fn to_preview(&self, rows: &[&Row], spec: &ExportSpec) -> String {
        format!(
            "Excel format preview:\nWorksheet: {}\nColumns: {}\nRows: {}\nFormatting: Preserved",
            spec.settings.sheet_name,
            spec.fields.join(", "),
            rows.len()
        )
    }
}

fn apply_range<'a>(rows: &[&'a Row], range: &ExportRange) -> Vec<&'a Row> {
    match range {
        ExportRange::All | ExportRange::Filtered => rows.to_vec(),
        ExportRange::Custom { start, end } => {
            let start = (*start).min(rows.len());
            let end = (*end).min(rows.len()).max(start);
            rows[start..end].to_vec()
        }
    }
}

fn render_cell(cell: Option<&CellValue>, settings: &ExportSettings) -> String {
    match cell {
        None | Some(CellValue::Empty) => String::new(),
        Some(cell) => {
            if settings.format_dates {
                if let Some(date) = parse_cell_date(cell) {
                    return date.format("%Y-%m-%d").to_string();
                }
            }
            cell.render()
        }
    }
}

fn cell_to_json(cell: &CellValue, settings: &ExportSettings) -> Value {
    if settings.format_dates {
        if let Some(date) = parse_cell_date(cell) {
            return Value::String(date.format("%Y-%m-%d").to_string());
        }
    }

    match cell {
        CellValue::Number(n) if settings.stringify_numbers => {
            Value::String(crate::domain::cell::format_number(*n))
        }
        other => serde_json::to_value(other).unwrap_or(Value::Null),
    }
}

fn build_filename(spec: &ExportSpec) -> String {
    let stem = spec
        .settings
        .filename
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("export");

    if spec.settings.include_timestamp {
        let stamp = chrono::Utc::now().format("%Y-%m-%d");
        format!("{}_{}.{}", stem, stamp, spec.format.extension())
    } else {
        format!("{}.{}", stem, spec.format.extension())
    }
}
