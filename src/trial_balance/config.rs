use std::path::PathBuf;

use crate::trial_balance::loader::StatementKind;

/// Default input directory.
pub const DEFAULT_INPUT_DIR: &str = "./";
/// Default combined workbook.
pub const DEFAULT_OUTPUT_FILE: &str = "tb_full.xlsx";
/// Default Balance Sheet filename pattern.
pub const DEFAULT_BS_PATTERN: &str = "Balance Sheet by Month-*.xlsx";
/// Default Income Statement filename pattern.
pub const DEFAULT_IS_PATTERN: &str = "Profit and Loss by Month-*.xlsx";

/// Placeholder in filename patterns standing for the month of the file.
pub const MONTH_PLACEHOLDER: &str = "yyyy-mm";

/// Where the statement workbooks are found and where the result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    /// Glob for Balance Sheet workbooks; may contain [`MONTH_PLACEHOLDER`].
    pub bs_pattern: String,
    /// Glob for Income Statement workbooks; may contain [`MONTH_PLACEHOLDER`].
    pub is_pattern: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            bs_pattern: DEFAULT_BS_PATTERN.to_string(),
            is_pattern: DEFAULT_IS_PATTERN.to_string(),
        }
    }
}

impl Config {
    /// Filename pattern for the given statement type.
    pub fn pattern(&self, kind: StatementKind) -> &str {
        match kind {
            StatementKind::BalanceSheet => &self.bs_pattern,
            StatementKind::IncomeStatement => &self.is_pattern,
        }
    }
}
