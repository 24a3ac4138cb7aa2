use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tb_processor::combine::{self, SkippedFile, StatementOutcome};
use tb_processor::config::{
    Config, DEFAULT_BS_PATTERN, DEFAULT_INPUT_DIR, DEFAULT_IS_PATTERN, DEFAULT_OUTPUT_FILE,
};
use tb_processor::io::excel_write::WriteMode;
use tb_processor::loader::StatementKind;
use tb_processor::{Result, discovery, logging};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose)?;
    let config = cli.paths.into_config();

    match cli.command {
        Command::Bs => execute_statement(
            &config,
            StatementKind::BalanceSheet,
            WriteMode::Create,
            cli.verbose,
        ),
        Command::Is => execute_statement(
            &config,
            StatementKind::IncomeStatement,
            WriteMode::Append,
            cli.verbose,
        ),
        Command::All => execute_all(&config, cli.verbose),
        Command::Info => show_info(&config),
    }
}

fn execute_statement(
    config: &Config,
    kind: StatementKind,
    mode: WriteMode,
    verbose: bool,
) -> Result<()> {
    println!("Processing {kind} files...");
    if verbose {
        list_files(config, kind)?;
    }
    let outcome = combine::run_statement(config, kind, mode)?;
    report(config, kind, &outcome);
    Ok(())
}

fn execute_all(config: &Config, verbose: bool) -> Result<()> {
    println!("Processing all files...");
    if verbose {
        list_files(config, StatementKind::BalanceSheet)?;
        list_files(config, StatementKind::IncomeStatement)?;
    }

    let outcomes = combine::run_all(config)?;
    if outcomes
        .iter()
        .all(|(_, outcome)| *outcome == StatementOutcome::NoFiles)
    {
        println!("No files found to process.");
        return Ok(());
    }

    for (kind, outcome) in &outcomes {
        report(config, *kind, outcome);
    }
    Ok(())
}

fn show_info(config: &Config) -> Result<()> {
    println!("TB Processor configuration:");
    println!("  Input directory: {}", config.input_dir.display());
    println!("  Output file: {}", config.output_file.display());
    println!("  Balance Sheet pattern: {}", config.bs_pattern);
    println!("  Income Statement pattern: {}", config.is_pattern);
    println!();
    list_files(config, StatementKind::BalanceSheet)?;
    list_files(config, StatementKind::IncomeStatement)
}

fn list_files(config: &Config, kind: StatementKind) -> Result<()> {
    let files = discovery::find_monthly_files(&config.input_dir, config.pattern(kind))?;
    println!("Found {} {kind} files:", files.len());
    for record in &files {
        println!("  - {} ({})", record.file_name(), record.month.format("%Y-%m"));
    }
    Ok(())
}

fn report(config: &Config, kind: StatementKind, outcome: &StatementOutcome) {
    match outcome {
        StatementOutcome::NoFiles => println!(
            "No {kind} files found matching '{}' in {}.",
            config.pattern(kind),
            config.input_dir.display()
        ),
        StatementOutcome::NoData {
            files,
            placeholders,
        } => {
            println!(
                "No {kind} data was extracted from {files} file(s). Please check the file format."
            );
            report_placeholders(placeholders);
        }
        StatementOutcome::Combined {
            files,
            placeholders,
            table,
        } => {
            println!(
                "[SUCCESS] {kind}: {} accounts x {} months from {files} file(s) written to {}",
                table.rows.len(),
                table.columns.len(),
                config.output_file.display()
            );
            report_placeholders(placeholders);
        }
    }
}

fn report_placeholders(placeholders: &[SkippedFile]) {
    if placeholders.is_empty() {
        return;
    }
    println!("warning: {} file(s) contributed no data:", placeholders.len());
    for skipped in placeholders {
        println!("  - {}: {}", display_name(&skipped.path), skipped.reason);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Combine monthly trial balance workbooks into one account-by-month workbook."
)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Combine the Balance Sheet files into a new output workbook.
    Bs,
    /// Combine the Income Statement files, adding the sheet to the output workbook.
    Is,
    /// Combine both statement types into a new output workbook.
    All,
    /// Show the configuration and the files that would be processed.
    Info,
}

#[derive(clap::Args)]
struct PathArgs {
    /// Directory holding the monthly workbooks.
    #[arg(long, global = true, env = "TB_INPUT_DIR", default_value = DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Combined workbook to write.
    #[arg(long, global = true, env = "TB_OUTPUT_FILE", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Filename pattern of Balance Sheet workbooks (`yyyy-mm` matches any month).
    #[arg(long, global = true, env = "TB_BS_PATTERN", default_value = DEFAULT_BS_PATTERN)]
    bs_pattern: String,

    /// Filename pattern of Income Statement workbooks (`yyyy-mm` matches any month).
    #[arg(long, global = true, env = "TB_IS_PATTERN", default_value = DEFAULT_IS_PATTERN)]
    is_pattern: String,
}

impl PathArgs {
    fn into_config(self) -> Config {
        Config {
            input_dir: self.input_dir,
            output_file: self.output,
            bs_pattern: self.bs_pattern,
            is_pattern: self.is_pattern,
        }
    }
}
