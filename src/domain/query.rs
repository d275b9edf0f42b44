use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::cell::CellValue;
use super::dataset::Row;

/// How the free-text term is matched against a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    #[default]
    Contains,
    Exact,
    StartsWith,
    EndsWith,
    Regex,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// The complete set of search/filter/sort parameters for one query
/// execution. Constructed fresh per search; never mutated by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuerySpec {
    pub text: String,
    pub mode: SearchMode,
    pub case_sensitive: bool,
    pub exact_match: bool,
    pub include_empty: bool,

    /// Columns participating in the per-column filter stage.
    pub selected_columns: Vec<String>,

    /// Expected value (or substring) per selected column.
    pub column_values: HashMap<String, String>,

    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,

    pub min_value: Option<f64>,
    pub max_value: Option<f64>,

    pub sort: Option<SortSpec>,
}

impl QuerySpec {
    pub fn with_text(text: &str, mode: SearchMode) -> Self {
        Self {
            text: text.to_string(),
            mode,
            ..Default::default()
        }
    }

    pub fn with_column_filter(mut self, column: &str, value: &str) -> Self {
        self.selected_columns.push(column.to_string());
        self.column_values
            .insert(column.to_string(), value.to_string());
        self
    }

    pub fn with_sort(mut self, column: &str, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec {
            column: column.to_string(),
            direction,
        });
        self
    }

    /// Number of active criteria, used when labelling saved filters.
    pub fn criteria_count(&self) -> usize {
        let mut count = 0;
        if !self.text.trim().is_empty() {
            count += 1;
        }
        count += self.selected_columns.len();
        if self.date_from.is_some() || self.date_to.is_some() {
            count += 1;
        }
        if self.min_value.is_some() || self.max_value.is_some() {
            count += 1;
        }
        if self.sort.is_some() {
            count += 1;
        }
        count
    }
}

/// Match statistics for one query execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStats {
    pub total_records: usize,
    pub result_count: usize,

    /// round(result_count / total_records * 100), 0 for an empty input.
    pub match_rate: u32,

    pub elapsed_ms: u128,
}

/// The ordered, filtered output of one query execution. Rows are
/// borrowed from the dataset, never copied.
#[derive(Debug)]
pub struct ResultSet<'a> {
    pub rows: Vec<&'a Row>,
    pub stats: SearchStats,
}

/// One hit of the viewer's incremental cell search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellMatch {
    pub row_index: usize,
    pub column: String,
    pub value: CellValue,
}
