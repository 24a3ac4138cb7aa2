use std::fmt;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};

/// Header used for the label column of placeholder tables.
pub const PLACEHOLDER_LABEL: &str = "Line Item";

/// A single spreadsheet cell as seen by the loader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Blank or absent cell.
    Empty,
    /// Numeric cell.
    Number(f64),
    /// Text cell. Booleans and Excel error values are carried as text too.
    Text(String),
    /// Cell holding a calendar date.
    Date(NaiveDate),
}

impl Cell {
    /// Returns `true` for absent cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Coerces the cell into a number. Never fails: anything that is not a
    /// finite number, or text spelling one, yields `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) if value.is_finite() => Some(*value),
            Cell::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
            _ => None,
        }
    }

    /// String form used for header labels and account labels.
    pub fn to_label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(value) => value.to_string(),
            Cell::Text(text) => text.clone(),
            Cell::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Headerless 2-D grid of cells read from one sheet.
pub type RawGrid = Vec<Vec<Cell>>;

/// Key of a non-label column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// Canonical month, always the first day of that month.
    Month(NaiveDate),
    /// Column whose header was not recognised as a date, kept verbatim.
    Label(String),
}

impl ColumnKey {
    /// Builds a month key, forcing the day to the first of the month.
    pub fn month(date: NaiveDate) -> Self {
        ColumnKey::Month(first_of_month(date))
    }

    pub fn as_month(&self) -> Option<NaiveDate> {
        match self {
            ColumnKey::Month(date) => Some(*date),
            ColumnKey::Label(_) => None,
        }
    }

    pub fn is_month(&self) -> bool {
        matches!(self, ColumnKey::Month(_))
    }

    /// Returns the column order used for every table: month columns ascending,
    /// then the remaining columns in their current order. The result holds
    /// indices into `keys`.
    pub fn canonical_order(keys: &[ColumnKey]) -> Vec<usize> {
        let mut months: Vec<(NaiveDate, usize)> = keys
            .iter()
            .enumerate()
            .filter_map(|(idx, key)| key.as_month().map(|month| (month, idx)))
            .collect();
        months.sort();

        months
            .into_iter()
            .map(|(_, idx)| idx)
            .chain(
                keys.iter()
                    .enumerate()
                    .filter(|(_, key)| !key.is_month())
                    .map(|(idx, _)| idx),
            )
            .collect()
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Month(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            ColumnKey::Label(label) => write!(f, "{label}"),
        }
    }
}

/// One data row of a cleaned statement table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Account name or number, stringified.
    pub label: String,
    /// One value per entry of [`CleanedTable::columns`]; `None` marks a cell
    /// that did not hold a number.
    pub values: Vec<Option<f64>>,
}

/// A single statement sheet after header detection and cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    /// Header of the label column.
    pub label: String,
    /// Keys of the non-label columns.
    pub columns: Vec<ColumnKey>,
    pub rows: Vec<TableRow>,
}

impl CleanedTable {
    /// Recovery result for a file whose month is known but whose data could
    /// not be extracted.
    pub fn placeholder(month: NaiveDate) -> Self {
        Self {
            label: PLACEHOLDER_LABEL.to_string(),
            columns: vec![ColumnKey::month(month)],
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Month columns together with their position in [`Self::columns`].
    pub fn months(&self) -> impl Iterator<Item = (usize, NaiveDate)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(idx, key)| key.as_month().map(|month| (idx, month)))
    }
}

/// One account row of a combined statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub label: String,
    pub values: Vec<f64>,
}

/// Account-by-month matrix produced by merging monthly tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CombinedTable {
    /// Header of the label column.
    pub label: String,
    pub columns: Vec<ColumnKey>,
    /// Rows sorted by label.
    pub rows: Vec<CombinedRow>,
}

impl CombinedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn months(&self) -> Vec<NaiveDate> {
        self.columns.iter().filter_map(ColumnKey::as_month).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }

    /// Looks up the value of `label` in column `key`.
    pub fn value(&self, label: &str, key: &ColumnKey) -> Option<f64> {
        let col = self.columns.iter().position(|column| column == key)?;
        self.rows
            .iter()
            .find(|row| row.label == label)
            .and_then(|row| row.values.get(col).copied())
    }
}

/// A discovered workbook and the month resolved from its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub month: NaiveDate,
}

impl FileRecord {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Moves `date` to the first day of its month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
