use serde::{Deserialize, Serialize};

/// Output format of one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    Csv,
    #[default]
    Json,
    /// Textual workbook summary; true binary workbook generation is
    /// deferred to a future library integration.
    ExcelPreview,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::ExcelPreview => "text/plain",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::ExcelPreview => "txt",
        }
    }
}

/// Which slice of the dataset is exported. `All` and `Filtered` are a
/// caller-side distinction (the serializer receives the rows either
/// way); `Custom` selects a half-open row window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportRange {
    #[default]
    All,
    Filtered,
    Custom {
        start: usize,
        end: usize,
    },
}

/// Formatting options, mirroring the export manager's advanced panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Output file stem; defaults to "export" when unset.
    pub filename: Option<String>,

    /// Worksheet label used by the excel preview.
    pub sheet_name: String,

    pub include_headers: bool,
    pub include_timestamp: bool,
    pub format_dates: bool,
    pub stringify_numbers: bool,
    pub pretty_print: bool,

    pub delimiter: char,
    pub text_qualifier: char,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            filename: None,
            sheet_name: "Sheet1".to_string(),
            include_headers: true,
            include_timestamp: true,
            format_dates: false,
            stringify_numbers: false,
            pretty_print: true,
            delimiter: ',',
            text_qualifier: '"',
        }
    }
}

/// Format + field + formatting configuration for one export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportSpec {
    pub format: ExportFormat,

    /// Ordered subset of columns to project into the output.
    pub fields: Vec<String>,

    pub range: ExportRange,
    pub settings: ExportSettings,
}

impl ExportSpec {
    pub fn new(format: ExportFormat, fields: Vec<String>) -> Self {
        Self {
            format,
            fields,
            ..Default::default()
        }
    }
}

/// The downloadable output handed to the download boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportArtifact {
    pub content: String,
    pub mime_type: String,
    pub suggested_filename: String,
}

impl ExportArtifact {
    /// Byte size of the serialized content, for the UI estimate.
    pub fn estimated_size(&self) -> usize {
        self.content.len()
    }
}
