use std::cmp::Ordering;

use crate::domain::cell::CellValue;
use crate::domain::dataset::Row;
use crate::domain::query::{SortDirection, SortSpec};

/// Stable sort of the surviving rows. Empty cells sink to the end in
/// ascending order; descending negates the whole comparator, which
/// puts them first.
pub(super) fn sort_rows(rows: &mut [&Row], spec: &SortSpec) {
    rows.sort_by(|a, b| {
        let ordering = compare_cells(a.get(&spec.column), b.get(&spec.column));
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_cells(a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
    match (present(a), present(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.render().cmp(&b.render()),
        },
    }
}

fn present(value: Option<&CellValue>) -> Option<&CellValue> {
    value.filter(|v| !v.is_empty())
}
