use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;
use tb_processor::combine::{self, StatementOutcome};
use tb_processor::config::Config;
use tb_processor::discovery;
use tb_processor::io::excel_read::ExcelWorkbook;
use tb_processor::io::excel_write::{self, WriteMode};
use tb_processor::io::{GridSource, SheetSelector};
use tb_processor::loader::{self, LoadSource, StatementKind};
use tb_processor::model::{Cell, ColumnKey, CombinedRow, CombinedTable};
use tempfile::tempdir;

enum Fixture {
    Text(&'static str),
    Number(f64),
    Blank,
}

use Fixture::{Blank, Number, Text};

fn write_fixture(path: &Path, sheet: &str, rows: &[Vec<Fixture>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).expect("sheet named");
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (row_idx, col_idx) = (row_idx as u32, col_idx as u16);
            match cell {
                Text(text) => {
                    worksheet
                        .write_string(row_idx, col_idx, *text)
                        .expect("string written");
                }
                Number(value) => {
                    worksheet
                        .write_number(row_idx, col_idx, *value)
                        .expect("number written");
                }
                Blank => {}
            }
        }
    }
    workbook.save(path).expect("fixture saved");
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn config_for(dir: &Path) -> Config {
    Config {
        input_dir: dir.to_path_buf(),
        output_file: dir.join("out").join("tb_full.xlsx"),
        ..Config::default()
    }
}

fn january_balance_sheet(dir: &Path) -> PathBuf {
    let path = dir.join("Balance Sheet by Month-2023-01.xlsx");
    write_fixture(
        &path,
        "Sheet1",
        &[
            vec![Text("Account"), Text("January 2023")],
            vec![Text("Cash"), Number(100.0)],
            vec![Text("AR"), Number(50.0)],
            vec![Text("Inventory"), Number(25.0)],
        ],
    );
    path
}

fn february_balance_sheet(dir: &Path) -> PathBuf {
    let path = dir.join("Balance Sheet by Month-2023-02.xlsx");
    write_fixture(
        &path,
        "Report",
        &[
            vec![Text("Northwind Traders")],
            vec![Text("Balance Sheet")],
            vec![Blank],
            vec![Text("Account"), Text("February 2023")],
            vec![Text("Assets")],
            vec![Text("Cash"), Number(110.0)],
            vec![Text("AR"), Number(45.0)],
            vec![Text("Inventory"), Number(30.0)],
        ],
    );
    path
}

#[test]
fn header_offsets_do_not_change_the_combined_shape() {
    let temp_dir = tempdir().expect("temporary directory");
    january_balance_sheet(temp_dir.path());
    february_balance_sheet(temp_dir.path());
    let config = config_for(temp_dir.path());

    let outcome = combine::run_statement(&config, StatementKind::BalanceSheet, WriteMode::Create)
        .expect("balance sheet processed");

    let StatementOutcome::Combined {
        files,
        placeholders,
        table,
    } = outcome
    else {
        panic!("expected combined output, got {outcome:?}");
    };
    let jan = ColumnKey::Month(ymd(2023, 1, 1));
    let feb = ColumnKey::Month(ymd(2023, 2, 1));
    assert_eq!(files, 2);
    assert!(placeholders.is_empty());
    assert_eq!(table.label, "Account");
    assert_eq!(table.labels(), vec!["AR", "Cash", "Inventory"]);
    assert_eq!(table.columns, vec![jan.clone(), feb.clone()]);
    assert_eq!(table.value("Cash", &jan), Some(100.0));
    assert_eq!(table.value("Inventory", &feb), Some(30.0));

    let mut output = ExcelWorkbook::open(&config.output_file).expect("output opened");
    assert_eq!(output.sheet_names(), vec!["Balance Sheet".to_string()]);
    let grid = output
        .read_grid(&SheetSelector::name("Balance Sheet"))
        .expect("output sheet read");
    assert_eq!(grid.len(), 4);
    assert_eq!(grid[0][0], Cell::from("Account"));
    assert_eq!(grid[1][0], Cell::from("AR"));
    assert_eq!(grid[2][2], Cell::Number(110.0));
}

#[test]
fn first_sheet_is_used_when_no_candidate_name_matches() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = february_balance_sheet(temp_dir.path());

    let load = loader::load_statement_file(&path, StatementKind::BalanceSheet);

    assert_eq!(load.source, LoadSource::Sheet(SheetSelector::Index(0)));
    assert_eq!(load.table.rows.len(), 3);
    assert_eq!(load.table.columns, vec![ColumnKey::Month(ymd(2023, 2, 1))]);
}

#[test]
fn unreadable_workbook_becomes_a_placeholder() {
    let temp_dir = tempdir().expect("temporary directory");
    january_balance_sheet(temp_dir.path());
    let broken = temp_dir.path().join("Balance Sheet by Month-2023-03.xlsx");
    fs::write(&broken, b"not a zip archive").expect("broken file written");

    let load = loader::load_statement_file(&broken, StatementKind::BalanceSheet);
    assert!(load.is_placeholder());
    assert_eq!(load.table.columns, vec![ColumnKey::Month(ymd(2023, 3, 1))]);

    let config = config_for(temp_dir.path());
    let outcome = combine::process_statement(&config, StatementKind::BalanceSheet)
        .expect("balance sheet processed");
    let StatementOutcome::Combined {
        files,
        placeholders,
        table,
    } = outcome
    else {
        panic!("expected combined output, got {outcome:?}");
    };
    assert_eq!(files, 2);
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].path, broken);
    assert!(placeholders[0].reason.contains("Excel read error"));
    assert_eq!(table.months(), vec![ymd(2023, 1, 1)]);
    assert_eq!(table.rows.len(), 3);
}

#[test]
fn missing_files_and_missing_data_are_reported_separately() {
    let temp_dir = tempdir().expect("temporary directory");
    let config = config_for(temp_dir.path());

    let outcome = combine::process_statement(&config, StatementKind::IncomeStatement)
        .expect("income statement processed");
    assert_eq!(outcome, StatementOutcome::NoFiles);

    write_fixture(
        &temp_dir.path().join("Profit and Loss by Month-2023-01.xlsx"),
        "Profit and Loss",
        &[
            vec![Text("Description"), Text("January 2023")],
            vec![Text("Income")],
            vec![Text("Expenses"), Text("n/a")],
        ],
    );
    let outcome =
        combine::run_statement(&config, StatementKind::IncomeStatement, WriteMode::Append)
            .expect("income statement processed");
    assert_eq!(
        outcome,
        StatementOutcome::NoData {
            files: 1,
            placeholders: Vec::new(),
        }
    );
    assert!(!config.output_file.exists());
}

#[test]
fn discovery_orders_by_filename_month() {
    let temp_dir = tempdir().expect("temporary directory");
    february_balance_sheet(temp_dir.path());
    january_balance_sheet(temp_dir.path());
    fs::write(temp_dir.path().join("notes.txt"), "ignored").expect("note written");

    let files =
        discovery::find_monthly_files(temp_dir.path(), "Balance Sheet by Month-yyyy-mm.xlsx")
            .expect("files discovered");

    let months: Vec<NaiveDate> = files.iter().map(|record| record.month).collect();
    assert_eq!(months, vec![ymd(2023, 1, 1), ymd(2023, 2, 1)]);
    assert_eq!(files[0].file_name(), "Balance Sheet by Month-2023-01.xlsx");
}

#[test]
fn missing_input_directory_is_reported_as_no_files() {
    let temp_dir = tempdir().expect("temporary directory");
    let absent = temp_dir.path().join("absent");

    let files = discovery::find_monthly_files(&absent, "*.xlsx").expect("discovery succeeds");
    assert!(files.is_empty());

    let config = config_for(&absent);
    let outcome = combine::process_statement(&config, StatementKind::BalanceSheet)
        .expect("balance sheet processed");
    assert_eq!(outcome, StatementOutcome::NoFiles);

    let outcomes = combine::run_all(&config).expect("all statements processed");
    assert!(outcomes.iter().all(|(_, outcome)| *outcome == StatementOutcome::NoFiles));
    assert!(!config.output_file.exists());
}

#[test]
fn append_replaces_same_named_sheet_and_keeps_others() {
    let temp_dir = tempdir().expect("temporary directory");
    let output = temp_dir.path().join("tb_full.xlsx");
    let month = ColumnKey::Month(ymd(2023, 1, 1));
    let table = |label: &str, value: f64| CombinedTable {
        label: "Account".into(),
        columns: vec![month.clone()],
        rows: vec![CombinedRow {
            label: label.into(),
            values: vec![value],
        }],
    };

    let cash = table("Cash", 1.0);
    let sales = table("Sales", 2.0);
    let rent = table("Rent", 3.0);
    excel_write::write_tables(&output, &[("Balance Sheet", &cash)], WriteMode::Create)
        .expect("balance sheet written");
    excel_write::write_tables(&output, &[("Income Statement", &sales)], WriteMode::Append)
        .expect("income statement appended");
    excel_write::write_tables(&output, &[("Income Statement", &rent)], WriteMode::Append)
        .expect("income statement replaced");

    let mut workbook = ExcelWorkbook::open(&output).expect("output opened");
    assert_eq!(
        workbook.sheet_names(),
        vec!["Balance Sheet".to_string(), "Income Statement".to_string()]
    );
    let balance = workbook
        .read_grid(&SheetSelector::name("Balance Sheet"))
        .expect("balance sheet read");
    assert_eq!(balance[1][0], Cell::from("Cash"));
    assert_eq!(balance[1][1], Cell::Number(1.0));
    let income = workbook
        .read_grid(&SheetSelector::Index(1))
        .expect("income statement read");
    assert_eq!(income.len(), 2);
    assert_eq!(income[1][0], Cell::from("Rent"));
    assert_eq!(income[1][1], Cell::Number(3.0));
}

#[test]
fn months_before_1900_are_written_as_header_text() {
    let temp_dir = tempdir().expect("temporary directory");
    let output = temp_dir.path().join("tb_full.xlsx");
    let table = CombinedTable {
        label: "Account".into(),
        columns: vec![
            ColumnKey::Month(ymd(1899, 12, 1)),
            ColumnKey::Month(ymd(1900, 1, 1)),
        ],
        rows: vec![CombinedRow {
            label: "Cash".into(),
            values: vec![4.0, 5.0],
        }],
    };

    excel_write::write_tables(&output, &[("Balance Sheet", &table)], WriteMode::Create)
        .expect("balance sheet written");

    let mut workbook = ExcelWorkbook::open(&output).expect("output opened");
    let grid = workbook
        .read_grid(&SheetSelector::name("Balance Sheet"))
        .expect("balance sheet read");
    assert_eq!(grid[0][1], Cell::from("1899-12-01"));
    assert_eq!(grid[1][1], Cell::Number(4.0));
    assert_eq!(grid[1][2], Cell::Number(5.0));
}
