use std::path::{Path, PathBuf};

use glob::{Pattern, glob};
use tracing::{debug, warn};

use crate::trial_balance::config::MONTH_PLACEHOLDER;
use crate::trial_balance::error::Result;
use crate::trial_balance::file_date;
use crate::trial_balance::model::FileRecord;

/// Finds the workbooks in `input_dir` matching `pattern`, oldest month first.
///
/// The [`MONTH_PLACEHOLDER`] in `pattern` matches anything. Files resolving
/// to the same month are ordered by path. No match, including a missing
/// `input_dir`, is an empty result.
pub fn find_monthly_files(input_dir: &Path, pattern: &str) -> Result<Vec<FileRecord>> {
    if !input_dir.is_dir() {
        warn!(dir = %input_dir.display(), "input directory not found");
        return Ok(Vec::new());
    }

    let file_pattern = pattern.replace(MONTH_PLACEHOLDER, "*");
    let full_pattern =
        PathBuf::from(Pattern::escape(&input_dir.to_string_lossy())).join(&file_pattern);
    debug!(pattern = %full_pattern.display(), "searching for statement files");

    let mut records: Vec<FileRecord> = Vec::new();
    for entry in glob(&full_pattern.to_string_lossy())? {
        match entry {
            Ok(path) if path.is_file() => records.push(FileRecord {
                month: file_date::resolve(&path),
                path,
            }),
            Ok(_) => {}
            Err(error) => warn!(%error, "skipping unreadable directory entry"),
        }
    }

    records.sort_by(|lhs, rhs| lhs.month.cmp(&rhs.month).then_with(|| lhs.path.cmp(&rhs.path)));
    Ok(records)
}
