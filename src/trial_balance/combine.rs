use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::trial_balance::config::Config;
use crate::trial_balance::discovery;
use crate::trial_balance::error::Result;
use crate::trial_balance::io::excel_write::{self, WriteMode};
use crate::trial_balance::loader::{self, LoadSource, StatementKind};
use crate::trial_balance::merge;
use crate::trial_balance::model::{CombinedTable, FileRecord};

/// What processing one statement type produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    /// The pattern matched no files.
    NoFiles,
    /// Files were found but none yielded a data row.
    NoData {
        files: usize,
        /// Files that had to be replaced by a placeholder table.
        placeholders: Vec<SkippedFile>,
    },
    /// A combined table with at least one row.
    Combined {
        files: usize,
        placeholders: Vec<SkippedFile>,
        table: CombinedTable,
    },
}

impl StatementOutcome {
    pub fn table(&self) -> Option<&CombinedTable> {
        match self {
            StatementOutcome::Combined { table, .. } => Some(table),
            _ => None,
        }
    }
}

/// A workbook that was replaced by a placeholder table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    /// Last load failure, as reported by the statement loader.
    pub reason: String,
}

/// A merged statement plus the files that contributed nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    pub table: CombinedTable,
    pub placeholders: Vec<SkippedFile>,
}

/// Loads every file as a statement of `kind` and merges them in order.
#[instrument(level = "info", skip_all, fields(files = files.len(), statement = %kind))]
pub fn combine_files(files: &[FileRecord], kind: StatementKind) -> Combination {
    let mut tables = Vec::with_capacity(files.len());
    let mut placeholders = Vec::new();

    for record in files {
        info!(file = %record.file_name(), month = %record.month, "loading statement");
        let load = loader::load_statement_file(&record.path, kind);
        if let LoadSource::Placeholder(reason) = &load.source {
            placeholders.push(SkippedFile {
                path: record.path.clone(),
                reason: reason.clone(),
            });
        }
        tables.push(load.table);
    }

    let table = merge::merge(&tables);
    info!(
        rows = table.rows.len(),
        months = table.columns.len(),
        placeholders = placeholders.len(),
        "statements merged"
    );
    Combination {
        table,
        placeholders,
    }
}

/// Discovers and combines the files of one statement type without writing.
#[instrument(level = "info", skip_all, fields(statement = %kind))]
pub fn process_statement(config: &Config, kind: StatementKind) -> Result<StatementOutcome> {
    let files = discovery::find_monthly_files(&config.input_dir, config.pattern(kind))?;
    if files.is_empty() {
        warn!(pattern = config.pattern(kind), "no statement files found");
        return Ok(StatementOutcome::NoFiles);
    }

    let Combination {
        table,
        placeholders,
    } = combine_files(&files, kind);
    if table.is_empty() {
        warn!(files = files.len(), "no data extracted");
        return Ok(StatementOutcome::NoData {
            files: files.len(),
            placeholders,
        });
    }

    Ok(StatementOutcome::Combined {
        files: files.len(),
        placeholders,
        table,
    })
}

/// Processes one statement type and writes it to its sheet of the output
/// workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(statement = %kind, output = %config.output_file.display())
)]
pub fn run_statement(
    config: &Config,
    kind: StatementKind,
    mode: WriteMode,
) -> Result<StatementOutcome> {
    let outcome = process_statement(config, kind)?;
    if let Some(table) = outcome.table() {
        excel_write::write_tables(&config.output_file, &[(kind.output_sheet(), table)], mode)?;
        info!(sheet = kind.output_sheet(), "statement written");
    }
    Ok(outcome)
}

/// Processes both statement types into a fresh output workbook. Statement
/// types without data are reported and left out; nothing is written when
/// neither has data.
#[instrument(level = "info", skip_all, fields(output = %config.output_file.display()))]
pub fn run_all(config: &Config) -> Result<Vec<(StatementKind, StatementOutcome)>> {
    let outcomes = [StatementKind::BalanceSheet, StatementKind::IncomeStatement]
        .into_iter()
        .map(|kind| process_statement(config, kind).map(|outcome| (kind, outcome)))
        .collect::<Result<Vec<_>>>()?;

    let sheets: Vec<(&str, &CombinedTable)> = outcomes
        .iter()
        .filter_map(|(kind, outcome)| outcome.table().map(|table| (kind.output_sheet(), table)))
        .collect();

    if !sheets.is_empty() {
        excel_write::write_tables(&config.output_file, &sheets, WriteMode::Create)?;
        info!(sheets = sheets.len(), "workbook written");
    }
    Ok(outcomes)
}
