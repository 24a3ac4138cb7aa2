//! Header row detection for report-style sheets with title blocks above the table.

use tracing::{debug, warn};

use crate::trial_balance::model::{Cell, RawGrid};

/// Number of leading rows inspected for a header.
pub const HEADER_SCAN_ROWS: usize = 15;

/// Terms that mark a header row. Matched as substrings of the lower-cased row
/// text.
pub const HEADER_KEYWORDS: [&str; 10] = [
    "account",
    "description",
    "total",
    "item",
    "distribution account",
    "january",
    "february",
    "gl",
    "gl code",
    "account number",
];

/// Returns the 0-based index of the most likely header row.
///
/// A row naming January, February and March is taken immediately; otherwise
/// the first row containing any of [`HEADER_KEYWORDS`] wins. Falls back to
/// row 0 when nothing in the first [`HEADER_SCAN_ROWS`] rows matches.
pub fn locate(grid: &RawGrid) -> usize {
    for (idx, row) in grid.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let text = row_text(row);

        if ["january", "february", "march"]
            .iter()
            .all(|month| text.contains(month))
        {
            debug!(row = idx, "header row found by month names");
            return idx;
        }

        if HEADER_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
            debug!(row = idx, "header row found by keyword");
            return idx;
        }
    }

    if !grid.is_empty() {
        warn!(
            scanned = grid.len().min(HEADER_SCAN_ROWS),
            "no header row recognised, assuming row 0"
        );
    }
    0
}

fn row_text(row: &[Cell]) -> String {
    row.iter()
        .filter(|cell| !cell.is_blank())
        .map(|cell| cell.to_label().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
