//! Turns raw statement sheets into [`CleanedTable`]s.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::trial_balance::error::{Result, ToolError};
use crate::trial_balance::file_date;
use crate::trial_balance::header;
use crate::trial_balance::io::excel_read::ExcelWorkbook;
use crate::trial_balance::io::{GridSource, SheetSelector};
use crate::trial_balance::model::{Cell, CleanedTable, ColumnKey, RawGrid, TableRow};
use crate::trial_balance::normalize;

static EMPTY_CELL: Cell = Cell::Empty;

const BALANCE_SHEET_CANDIDATES: [&str; 4] = ["Sheet1", "Balance Sheet", "BS", "Balance_Sheet"];
const INCOME_STATEMENT_CANDIDATES: [&str; 5] =
    ["Sheet1", "Income Statement", "Profit and Loss", "P&L", "IS"];

/// The two statement families this tool combines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    BalanceSheet,
    IncomeStatement,
}

impl StatementKind {
    /// Sheet names tried, in order, before falling back to the first sheet.
    pub fn candidate_sheets(self) -> &'static [&'static str] {
        match self {
            StatementKind::BalanceSheet => &BALANCE_SHEET_CANDIDATES,
            StatementKind::IncomeStatement => &INCOME_STATEMENT_CANDIDATES,
        }
    }

    /// Name of the sheet the combined statement is written to.
    pub fn output_sheet(self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "Balance Sheet",
            StatementKind::IncomeStatement => "Income Statement",
        }
    }

    fn selectors(self) -> impl Iterator<Item = SheetSelector> {
        self.candidate_sheets()
            .iter()
            .map(|name| SheetSelector::name(*name))
            .chain(std::iter::once(SheetSelector::Index(0)))
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.output_sheet())
    }
}

/// Where a statement table came from.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadSource {
    /// Loaded from the given sheet.
    Sheet(SheetSelector),
    /// Every candidate failed; the table is a placeholder. Carries the last
    /// error message.
    Placeholder(String),
}

/// Result of loading one statement workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementLoad {
    pub table: CleanedTable,
    pub source: LoadSource,
}

impl StatementLoad {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.source, LoadSource::Placeholder(_))
    }
}

/// Opens `path` and loads the statement of the given kind from it.
///
/// Never fails: an unreadable workbook or sheet yields a placeholder table
/// keyed by the month resolved from the filename.
pub fn load_statement_file(path: &Path, kind: StatementKind) -> StatementLoad {
    let month = file_date::resolve(path);
    match ExcelWorkbook::open(path) {
        Ok(mut workbook) => load_statement(&mut workbook, kind, month),
        Err(error) => {
            warn!(
                file = %path.display(),
                %error,
                "cannot open workbook, substituting an empty table"
            );
            StatementLoad {
                table: CleanedTable::placeholder(month),
                source: LoadSource::Placeholder(error.to_string()),
            }
        }
    }
}

/// Tries each candidate sheet of `kind` in order, then the first sheet, and
/// returns the first one that loads. When all fail, returns a placeholder
/// table with a single `fallback_month` column.
pub fn load_statement<S: GridSource>(
    source: &mut S,
    kind: StatementKind,
    fallback_month: NaiveDate,
) -> StatementLoad {
    let mut last_error: Option<ToolError> = None;

    for selector in kind.selectors() {
        match load_sheet(source, &selector) {
            Ok(table) => {
                debug!(sheet = %selector, rows = table.rows.len(), "statement sheet loaded");
                return StatementLoad {
                    table,
                    source: LoadSource::Sheet(selector),
                };
            }
            Err(error) => {
                debug!(sheet = %selector, %error, "candidate sheet rejected");
                last_error = Some(error);
            }
        }
    }

    let reason = last_error
        .map(|error| error.to_string())
        .unwrap_or_else(|| "no candidate sheets".to_string());
    warn!(
        statement = %kind,
        month = %fallback_month,
        %reason,
        "no sheet could be loaded, substituting an empty table"
    );
    StatementLoad {
        table: CleanedTable::placeholder(fallback_month),
        source: LoadSource::Placeholder(reason),
    }
}

/// Reads one sheet and cleans it with [`clean_grid`].
pub fn load_sheet<S: GridSource>(source: &mut S, selector: &SheetSelector) -> Result<CleanedTable> {
    let grid = source.read_grid(selector)?;
    Ok(clean_grid(&grid))
}

/// Cleans a headerless grid into a statement table.
///
/// The header row is located with [`header::locate`]; rows above it are
/// discarded. The first column is the label column. Remaining headers are
/// normalised into months where possible, rows without any numeric value
/// and columns without any value are dropped, month columns are sorted
/// ascending ahead of the other columns, and blanks in all-numeric columns
/// become 0.
pub fn clean_grid(grid: &RawGrid) -> CleanedTable {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let header_idx = header::locate(grid);

    let header_row = grid.get(header_idx).map(Vec::as_slice).unwrap_or(&[]);
    let headers: Vec<Cell> = (0..width.max(1))
        .map(|idx| header_label(header_row.get(idx), idx))
        .collect();
    let label = headers[0].to_label();
    let keys: Vec<ColumnKey> = headers[1..].iter().map(normalize::normalize).collect();

    let data_rows: Vec<&[Cell]> = grid
        .iter()
        .skip(header_idx + 1)
        .map(Vec::as_slice)
        .filter(|row| has_numeric_value(row))
        .collect();

    let kept: Vec<usize> = (1..width)
        .filter(|col| data_rows.iter().any(|row| !cell_at(row, *col).is_blank()))
        .collect();
    let kept_keys: Vec<ColumnKey> = kept.iter().map(|col| keys[col - 1].clone()).collect();
    let ordered: Vec<usize> = ColumnKey::canonical_order(&kept_keys)
        .into_iter()
        .map(|idx| kept[idx])
        .collect();

    let numeric: Vec<bool> = ordered
        .iter()
        .map(|col| {
            data_rows.iter().all(|row| {
                let cell = cell_at(row, *col);
                cell.is_blank() || cell.as_number().is_some()
            })
        })
        .collect();

    let rows = data_rows
        .iter()
        .map(|row| TableRow {
            label: cell_at(row, 0).to_label(),
            values: ordered
                .iter()
                .zip(&numeric)
                .map(|(col, all_numeric)| {
                    let cell = cell_at(row, *col);
                    match cell.as_number() {
                        Some(value) => Some(value),
                        None if *all_numeric => Some(0.0),
                        None => None,
                    }
                })
                .collect(),
        })
        .collect::<Vec<_>>();

    let columns: Vec<ColumnKey> = ordered.iter().map(|col| keys[col - 1].clone()).collect();
    debug!(
        header_row = header_idx,
        rows = rows.len(),
        months = columns.iter().filter(|key| key.is_month()).count(),
        "sheet cleaned"
    );

    CleanedTable {
        label,
        columns,
        rows,
    }
}

/// Stringified, trimmed header label. Date cells stay dates; blanks get a
/// positional placeholder.
fn header_label(cell: Option<&Cell>, idx: usize) -> Cell {
    match cell {
        Some(Cell::Date(date)) => Cell::Date(*date),
        Some(cell) if !cell.is_blank() => Cell::Text(cell.to_label().trim().to_string()),
        _ => Cell::Text(format!("Column_{idx}")),
    }
}

fn has_numeric_value(row: &[Cell]) -> bool {
    row.iter().skip(1).any(|cell| cell.as_number().is_some())
}

fn cell_at(row: &[Cell], col: usize) -> &Cell {
    row.get(col).unwrap_or(&EMPTY_CELL)
}
