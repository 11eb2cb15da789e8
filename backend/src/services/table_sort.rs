//! Generic column sort shared by every table view.
//!
//! Values compare numerically when both are numbers and by their text
//! otherwise. A row whose sort cell is absent or falsy (`null`, `false`, `0`,
//! `""`) is incomparable: it stays at its original position while the
//! comparable rows are stably sorted through the remaining positions.

use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::config::TableConfig;
use crate::routes::journey::{JourneyTable, SortDirection, SortSpec};

/// One table row: column name → cell value.
pub type TableRow = Map<String, Value>;

/// True for cells that never take part in a comparison.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn sort_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Compare two cells; `None` when either is absent or falsy.
pub fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Option<Ordering> {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) if !is_falsy(a) && !is_falsy(b) => (a, b),
        _ => return None,
    };

    let ordering = match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => sort_text(a).cmp(&sort_text(b)),
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => sort_text(a).cmp(&sort_text(b)),
    };
    Some(ordering)
}

/// Sorted copy of `rows`; the input is left untouched.
pub fn sort_rows(rows: &[TableRow], spec: &SortSpec) -> Vec<TableRow> {
    let cell = move |i: usize| rows[i].get(spec.column.as_str());
    let comparable: Vec<bool> = (0..rows.len())
        .map(|i| cell(i).map(|v| !is_falsy(v)).unwrap_or(false))
        .collect();

    let mut order: Vec<usize> = (0..rows.len()).filter(|&i| comparable[i]).collect();
    stable_merge_sort(&mut order, &|a, b| {
        let ordering = compare_cells(cell(a), cell(b)).unwrap_or(Ordering::Equal);
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let mut sorted = order.into_iter();
    (0..rows.len())
        .map(|i| {
            let source = if comparable[i] {
                sorted.next().unwrap_or(i)
            } else {
                i
            };
            rows[source].clone()
        })
        .collect()
}

/// Top-down merge sort of indices. Stable, and well defined even when the
/// comparator is not a total order (mixed number/text columns).
fn stable_merge_sort<F>(items: &mut [usize], compare: &F)
where
    F: Fn(usize, usize) -> Ordering,
{
    let len = items.len();
    if len <= 1 {
        return;
    }

    let mid = len / 2;
    stable_merge_sort(&mut items[..mid], compare);
    stable_merge_sort(&mut items[mid..], compare);

    let mut merged = Vec::with_capacity(len);
    let (mut i, mut j) = (0, mid);
    while i < mid && j < len {
        if compare(items[j], items[i]) == Ordering::Less {
            merged.push(items[j]);
            j += 1;
        } else {
            merged.push(items[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&items[i..mid]);
    merged.extend_from_slice(&items[j..]);
    items.copy_from_slice(&merged);
}

/// Column headers of a table, taken from the first row.
pub fn headers(rows: &[TableRow]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

/// Interactive sort state of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    spec: SortSpec,
}

impl SortState {
    pub fn new(spec: SortSpec) -> Self {
        Self { spec }
    }

    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(SortSpec::new(
            config.default_column.clone(),
            config.default_direction,
        ))
    }

    pub fn spec(&self) -> &SortSpec {
        &self.spec
    }

    /// Header click: the same column flips direction, a new column starts
    /// ascending.
    pub fn toggle(&mut self, column: &str) {
        if self.spec.column == column {
            self.spec.direction = self.spec.direction.flipped();
        } else {
            self.spec = SortSpec::asc(column);
        }
    }

    pub fn apply(&self, rows: &[TableRow]) -> Vec<TableRow> {
        sort_rows(rows, &self.spec)
    }

    /// Sorted table with headers, ready for rendering.
    pub fn table(&self, rows: &[TableRow]) -> JourneyTable {
        JourneyTable {
            headers: headers(rows),
            rows: self.apply(rows),
            sort: self.spec.clone(),
        }
    }
}
