use std::time::Instant;

use tracing::debug;

use crate::application::use_cases::column_classifier::find_date_column;
use crate::domain::dataset::{Row, Sheet};
use crate::domain::query::{CellMatch, QuerySpec, ResultSet, SearchStats};

use super::filters::{column_filters_pass, date_range_pass, numeric_range_pass};
use super::sort::sort_rows;
use super::text_search::TextMatcher;

pub struct QueryEngine;

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run every active stage over the rows. Pure and deterministic:
    /// the input is never mutated and identical inputs yield an
    /// identical ordered result set.
    pub fn execute<'a>(&self, rows: &'a [Row], spec: &QuerySpec) -> ResultSet<'a> {
        let started = Instant::now();
        let total_records = rows.len();

        let mut results: Vec<&'a Row> = rows.iter().collect();

        if !spec.text.trim().is_empty() {
            let matcher = TextMatcher::new(spec);
            results.retain(|row| matcher.matches(row));
        }

        if !spec.selected_columns.is_empty() {
            results.retain(|row| column_filters_pass(row, spec));
        }

        if spec.date_from.is_some() || spec.date_to.is_some() {
            // only applies when the surviving rows expose a date-bearing column
            if let Some(column) = find_date_column(&results) {
                results.retain(|row| date_range_pass(row, &column, spec.date_from, spec.date_to));
            }
        }

        if spec.min_value.is_some() || spec.max_value.is_some() {
            results.retain(|row| numeric_range_pass(row, spec.min_value, spec.max_value));
        }

        if let Some(sort) = &spec.sort {
            sort_rows(&mut results, sort);
        }

        let result_count = results.len();
        let match_rate = if total_records > 0 {
            ((result_count as f64 / total_records as f64) * 100.0).round() as u32
        } else {
            0
        };
        let elapsed_ms = started.elapsed().as_millis();

        debug!(
            total = total_records,
            matched = result_count,
            match_rate,
            elapsed_ms = elapsed_ms as u64,
            "Query executed"
        );

        ResultSet {
            rows: results,
            stats: SearchStats {
                total_records,
                result_count,
                match_rate,
                elapsed_ms,
            },
        }
    }

    /// Incremental cell search used by the grid viewer: every cell
    /// containing the term, in row then column order.
    pub fn find_cells(&self, sheet: &Sheet, term: &str) -> Vec<CellMatch> {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        for (row_index, row) in sheet.rows.iter().enumerate() {
            for (column, value) in row {
                if value.is_empty() {
                    continue;
                }
                if value.render().to_lowercase().contains(&needle) {
                    matches.push(CellMatch {
                        row_index,
                        column: column.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::CellValue;
    use crate::domain::dataset::row_from_pairs;
    use crate::domain::query::{SearchMode, SortDirection};
    use chrono::NaiveDate;

    fn employees() -> Vec<Row> {
        vec![
            row_from_pairs(&[
                ("id", CellValue::from(1i64)),
                ("name", CellValue::from("John Smith")),
                ("dept", CellValue::from("Eng")),
            ]),
            row_from_pairs(&[
                ("id", CellValue::from(2i64)),
                ("name", CellValue::from("Jane Doe")),
                ("dept", CellValue::from("Sales")),
            ]),
        ]
    }

    #[test]
    fn test_contains_scenario() {
        let rows = employees();
        let spec = QuerySpec::with_text("john", SearchMode::Contains);

        let result = QueryEngine::new().execute(&rows, &spec);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0]["id"], CellValue::Number(1.0));
        assert_eq!(result.stats.match_rate, 50);
        assert_eq!(result.stats.total_records, 2);
    }

    #[test]
    fn test_case_sensitive_contains() {
        let rows = employees();
        let spec = QuerySpec {
            case_sensitive: true,
            ..QuerySpec::with_text("john", SearchMode::Contains)
        };
        assert_eq!(QueryEngine::new().execute(&rows, &spec).rows.len(), 0);
    }

    #[test]
    fn test_regex_prefix_matches_both_names() {
        let rows = vec![
            row_from_pairs(&[
                ("name", CellValue::from("John Smith")),
                ("dept", CellValue::from("Eng")),
            ]),
            row_from_pairs(&[
                ("name", CellValue::from("Jane Doe")),
                ("dept", CellValue::from("Sales")),
            ]),
        ];
        let spec = QuerySpec::with_text("^J", SearchMode::Regex);

        let result = QueryEngine::new().execute(&rows, &spec);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.stats.match_rate, 100);
    }

    #[test]
    fn test_invalid_regex_returns_empty_result_set() {
        let rows = employees();
        let spec = QuerySpec::with_text("([", SearchMode::Regex);

        let result = QueryEngine::new().execute(&rows, &spec);
        assert_eq!(result.rows.len(), 0);
        assert_eq!(result.stats.match_rate, 0);
    }

    #[test]
    fn test_exact_and_affix_modes() {
        let rows = vec![row_from_pairs(&[("word", CellValue::from("Hello"))])];
        let engine = QueryEngine::new();

        let exact = QuerySpec::with_text("hello", SearchMode::Exact);
        assert_eq!(engine.execute(&rows, &exact).rows.len(), 1);

        let prefix = QuerySpec::with_text("he", SearchMode::StartsWith);
        assert_eq!(engine.execute(&rows, &prefix).rows.len(), 1);

        let suffix = QuerySpec::with_text("LO", SearchMode::EndsWith);
        assert_eq!(engine.execute(&rows, &suffix).rows.len(), 1);

        let miss = QuerySpec::with_text("lo", SearchMode::StartsWith);
        assert_eq!(engine.execute(&rows, &miss).rows.len(), 0);
    }

    #[test]
    fn test_boolean_mode_is_or_of_terms() {
        let rows = employees();
        // neither row contains both terms, each row contains one
        let spec = QuerySpec::with_text("Eng AND Doe", SearchMode::Boolean);

        let result = QueryEngine::new().execute(&rows, &spec);
        assert_eq!(result.rows.len(), 2);
    }

    #[test]
    fn test_column_filter_stage_composes_with_text() {
        let rows = employees();
        let spec = QuerySpec::with_text("o", SearchMode::Contains)
            .with_column_filter("dept", "Sales");

        let result = QueryEngine::new().execute(&rows, &spec);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0]["name"].render(), "Jane Doe");
    }

    #[test]
    fn test_date_range_stage() {
        let rows = vec![
            row_from_pairs(&[
                ("name", CellValue::from("early")),
                ("hire_date", CellValue::from("2020-05-18")),
            ]),
            row_from_pairs(&[
                ("name", CellValue::from("late")),
                ("hire_date", CellValue::from("2023-02-14")),
            ]),
        ];
        let spec = QuerySpec {
            date_from: NaiveDate::from_ymd_opt(2022, 1, 1),
            ..Default::default()
        };

        let result = QueryEngine::new().execute(&rows, &spec);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0]["name"].render(), "late");
    }

    #[test]
    fn test_date_bounds_ignored_without_date_column() {
        let rows = vec![row_from_pairs(&[("name", CellValue::from("n"))])];
        let spec = QuerySpec {
            date_from: NaiveDate::from_ymd_opt(2022, 1, 1),
            ..Default::default()
        };
        assert_eq!(QueryEngine::new().execute(&rows, &spec).rows.len(), 1);
    }

    #[test]
    fn test_numeric_range_uses_first_coercible_column() {
        let rows = employees();
        // first coercible column is id, so min_value=2 keeps only Jane
        let spec = QuerySpec {
            min_value: Some(2.0),
            ..Default::default()
        };

        let result = QueryEngine::new().execute(&rows, &spec);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0]["name"].render(), "Jane Doe");
    }

    #[test]
    fn test_sort_stage_orders_results() {
        let rows = employees();
        let spec = QuerySpec::default().with_sort("name", SortDirection::Desc);

        let result = QueryEngine::new().execute(&rows, &spec);
        assert_eq!(result.rows[0]["name"].render(), "John Smith");
        assert_eq!(result.rows[1]["name"].render(), "Jane Doe");
    }

    #[test]
    fn test_execute_is_idempotent() {
        let rows = employees();
        let spec = QuerySpec::with_text("o", SearchMode::Contains)
            .with_sort("name", SortDirection::Asc);

        let engine = QueryEngine::new();
        let first: Vec<String> = engine
            .execute(&rows, &spec)
            .rows
            .iter()
            .map(|r| r["name"].render())
            .collect();
        let second: Vec<String> = engine
            .execute(&rows, &spec)
            .rows
            .iter()
            .map(|r| r["name"].render())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_monotonicity() {
        let rows = employees();
        let engine = QueryEngine::new();
        for spec in [
            QuerySpec::default(),
            QuerySpec::with_text("zzz", SearchMode::Contains),
            QuerySpec::default().with_column_filter("dept", "Eng"),
            QuerySpec {
                min_value: Some(0.0),
                max_value: Some(1e9),
                ..Default::default()
            },
        ] {
            assert!(engine.execute(&rows, &spec).rows.len() <= rows.len());
        }
    }

    #[test]
    fn test_empty_input_yields_zero_match_rate() {
        let result = QueryEngine::new().execute(&[], &QuerySpec::default());
        assert_eq!(result.stats.match_rate, 0);
        assert_eq!(result.stats.result_count, 0);
    }

    #[test]
    fn test_find_cells_reports_row_and_column() {
        let sheet = Sheet {
            name: "S".to_string(),
            headers: vec!["name".to_string(), "dept".to_string()],
            rows: employees()
                .into_iter()
                .map(|mut r| {
                    r.shift_remove("id");
                    r
                })
                .collect(),
        };

        let matches = QueryEngine::new().find_cells(&sheet, "smith");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].row_index, 0);
        assert_eq!(matches[0].column, "name");

        assert!(QueryEngine::new().find_cells(&sheet, "").is_empty());
    }
}
