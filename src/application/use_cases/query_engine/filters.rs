use chrono::NaiveDate;

use crate::application::use_cases::column_classifier::parse_cell_date;
use crate::domain::dataset::Row;
use crate::domain::query::QuerySpec;

/// Per-column filter stage. A selected column without a filter value
/// passes vacuously; an empty cell passes only with `include_empty`.
pub(super) fn column_filters_pass(row: &Row, spec: &QuerySpec) -> bool {
    for column in &spec.selected_columns {
        let Some(expected) = spec.column_values.get(column) else {
            continue;
        };
        if expected.is_empty() {
            continue;
        }

        match row.get(column) {
            None => {
                if !spec.include_empty {
                    return false;
                }
            }
            Some(cell) if cell.is_empty() => {
                if !spec.include_empty {
                    return false;
                }
            }
            Some(cell) => {
                let cell_text = cell.render();
                let (cell_cmp, expected_cmp) = if spec.case_sensitive {
                    (cell_text, expected.clone())
                } else {
                    (cell_text.to_lowercase(), expected.to_lowercase())
                };

                let passes = if spec.exact_match {
                    cell_cmp == expected_cmp
                } else {
                    cell_cmp.contains(&expected_cmp)
                };
                if !passes {
                    return false;
                }
            }
        }
    }

    true
}

/// Date-range stage over the detected date column. Cells that do not
/// parse as dates pass the stage.
pub(super) fn date_range_pass(
    row: &Row,
    column: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> bool {
    let Some(parsed) = row.get(column).and_then(parse_cell_date) else {
        return true;
    };

    if let Some(from) = from {
        if parsed < from {
            return false;
        }
    }
    if let Some(to) = to {
        if parsed > to {
            return false;
        }
    }
    true
}

/// Numeric-range stage. Uses the first numerically-coercible column of
/// the row; rows without one pass. A caller-specified column is pending
/// product confirmation.
pub(super) fn numeric_range_pass(row: &Row, min: Option<f64>, max: Option<f64>) -> bool {
    let Some(value) = row.values().find_map(|cell| cell.as_number()) else {
        return true;
    };

    if let Some(min) = min {
        if value < min {
            return false;
        }
    }
    if let Some(max) = max {
        if value > max {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::CellValue;
    use crate::domain::dataset::row_from_pairs;

    fn employee(dept: &str) -> Row {
        row_from_pairs(&[
            ("name", CellValue::from("John Smith")),
            ("dept", CellValue::from(dept)),
        ])
    }

    #[test]
    fn test_column_without_value_passes_vacuously() {
        let spec = QuerySpec {
            selected_columns: vec!["dept".to_string()],
            ..Default::default()
        };
        assert!(column_filters_pass(&employee("Eng"), &spec));
    }

    #[test]
    fn test_substring_vs_exact() {
        let substring = QuerySpec::default().with_column_filter("dept", "en");
        assert!(column_filters_pass(&employee("Engineering"), &substring));

        let exact = QuerySpec {
            exact_match: true,
            ..QuerySpec::default().with_column_filter("dept", "en")
        };
        assert!(!column_filters_pass(&employee("Engineering"), &exact));
        assert!(column_filters_pass(&employee("EN"), &exact));
    }

    #[test]
    fn test_empty_cell_honors_include_empty() {
        let row = row_from_pairs(&[("dept", CellValue::Empty)]);

        let strict = QuerySpec::default().with_column_filter("dept", "Eng");
        assert!(!column_filters_pass(&row, &strict));

        let lenient = QuerySpec {
            include_empty: true,
            ..QuerySpec::default().with_column_filter("dept", "Eng")
        };
        assert!(column_filters_pass(&row, &lenient));
    }

    #[test]
    fn test_date_range_bounds() {
        let row = row_from_pairs(&[("hire_date", CellValue::from("2022-03-15"))]);
        let march = NaiveDate::from_ymd_opt(2022, 3, 1);
        let april = NaiveDate::from_ymd_opt(2022, 4, 1);

        assert!(date_range_pass(&row, "hire_date", march, april));
        assert!(!date_range_pass(&row, "hire_date", april, None));
        assert!(!date_range_pass(&row, "hire_date", None, march));
    }

    #[test]
    fn test_unparseable_date_passes() {
        let row = row_from_pairs(&[("hire_date", CellValue::from("soon"))]);
        assert!(date_range_pass(
            &row,
            "hire_date",
            NaiveDate::from_ymd_opt(2022, 1, 1),
            None
        ));
    }

    #[test]
    fn test_numeric_range_uses_first_coercible_column() {
        let row = row_from_pairs(&[
            ("name", CellValue::from("Laptop")),
            ("quantity", CellValue::from("5")),
            ("price", CellValue::from("1299.99")),
        ]);

        // quantity, not price, is the filtered column
        assert!(numeric_range_pass(&row, Some(1.0), Some(10.0)));
        assert!(!numeric_range_pass(&row, Some(10.0), None));
    }

    #[test]
    fn test_row_without_numeric_column_passes() {
        let row = row_from_pairs(&[("name", CellValue::from("Laptop"))]);
        assert!(numeric_range_pass(&row, Some(10.0), Some(20.0)));
    }
}
