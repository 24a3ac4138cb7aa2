//! Outer join of monthly statement tables into one account-by-month matrix.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::debug;

use crate::trial_balance::model::{CleanedTable, ColumnKey, CombinedRow, CombinedTable};

/// Merges cleaned tables of one statement type.
///
/// Empty tables are ignored. Rows are the sorted union of every non-empty
/// account label; columns are every month seen, ascending. When several
/// tables report the same account for the same month, the later table wins.
/// Cells no table reports are 0. The label header comes from the first
/// non-empty table.
pub fn merge(tables: &[CleanedTable]) -> CombinedTable {
    let tables: Vec<&CleanedTable> = tables.iter().filter(|table| !table.is_empty()).collect();
    let Some(first) = tables.first() else {
        return CombinedTable::default();
    };

    let accounts: BTreeSet<&str> = tables
        .iter()
        .flat_map(|table| table.rows.iter())
        .map(|row| row.label.as_str())
        .filter(|label| !label.is_empty())
        .collect();

    let mut months: BTreeMap<NaiveDate, HashMap<&str, Option<f64>>> = BTreeMap::new();
    for table in &tables {
        let mut contributed = false;
        for (col, month) in table.months() {
            contributed = true;
            let column = months.entry(month).or_default();
            for row in table.rows.iter().filter(|row| !row.label.is_empty()) {
                column.insert(row.label.as_str(), row.values.get(col).copied().flatten());
            }
        }
        if !contributed {
            debug!(label = %table.label, "table has no month columns, skipped");
        }
    }

    let rows = accounts
        .iter()
        .map(|account| CombinedRow {
            label: (*account).to_string(),
            values: months
                .values()
                .map(|column| column.get(account).copied().flatten().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    CombinedTable {
        label: first.label.clone(),
        columns: months.keys().copied().map(ColumnKey::Month).collect(),
        rows,
    }
}
