use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use tracing::debug;

use crate::trial_balance::error::Result;
use crate::trial_balance::io::excel_read::{ExcelWorkbook, PositionedSheet};
use crate::trial_balance::model::{Cell, ColumnKey, CombinedTable};

const MONTH_FORMAT: &str = "mmm yyyy";
const DATE_FORMAT: &str = "yyyy-mm-dd";

/// How the output workbook is treated when it already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Start a new workbook, discarding any existing file.
    Create,
    /// Keep the existing sheets and replace any sheet with the same name.
    /// Behaves like [`WriteMode::Create`] when the file does not exist.
    Append,
}

/// Writes each `(sheet name, table)` pair as one sheet of the workbook at
/// `path`, creating parent directories as needed.
///
/// In [`WriteMode::Append`] existing sheets are read back and rewritten
/// (values only); a sheet sharing a name with a new table is replaced in
/// place and new sheets go after the existing ones.
pub fn write_tables(path: &Path, tables: &[(&str, &CombinedTable)], mode: WriteMode) -> Result<()> {
    let existing = match mode {
        WriteMode::Append if path.exists() => ExcelWorkbook::open(path)?.read_all()?,
        _ => Vec::new(),
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();
    let mut pending: Vec<(&str, &CombinedTable)> = tables.to_vec();

    for sheet in &existing {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        match pending.iter().position(|(name, _)| *name == sheet.name) {
            Some(idx) => {
                let (_, table) = pending.remove(idx);
                debug!(sheet = %sheet.name, "replacing existing sheet");
                write_table(worksheet, table)?;
            }
            None => write_preserved(worksheet, sheet)?,
        }
    }

    for (name, table) in pending {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name)?;
        write_table(worksheet, table)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, table: &CombinedTable) -> Result<()> {
    let header_format = Format::new().set_bold();
    let month_header_format = Format::new().set_bold().set_num_format(MONTH_FORMAT);

    worksheet.write_string_with_format(0, 0, &table.label, &header_format)?;
    for (idx, key) in table.columns.iter().enumerate() {
        let col = (idx + 1) as u16;
        match key {
            ColumnKey::Month(month) => match excel_date(*month) {
                Some(date) => {
                    worksheet.write_datetime_with_format(0, col, &date, &month_header_format)?;
                }
                None => {
                    let text = month.format("%Y-%m-%d").to_string();
                    worksheet.write_string_with_format(0, col, text, &header_format)?;
                }
            },
            ColumnKey::Label(label) => {
                worksheet.write_string_with_format(0, col, label, &header_format)?;
            }
        }
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        worksheet.write_string(excel_row, 0, &row.label)?;
        for (col_idx, value) in row.values.iter().enumerate() {
            worksheet.write_number(excel_row, (col_idx + 1) as u16, *value)?;
        }
    }

    let last_row = table.rows.len() as u32;
    let last_col = table.columns.len() as u16;
    worksheet.set_freeze_panes(1, 1)?;
    worksheet.autofilter(0, 0, last_row, last_col)?;
    worksheet.set_column_width(0, 40.0)?;
    Ok(())
}

fn write_preserved(worksheet: &mut Worksheet, sheet: &PositionedSheet) -> Result<()> {
    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let (origin_row, origin_col) = sheet.origin;

    for (row_idx, row) in sheet.grid.iter().enumerate() {
        let excel_row = origin_row + row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let excel_col = (origin_col as usize + col_idx) as u16;
            match cell {
                Cell::Empty => {}
                Cell::Number(value) => {
                    worksheet.write_number(excel_row, excel_col, *value)?;
                }
                Cell::Text(text) => {
                    worksheet.write_string(excel_row, excel_col, text)?;
                }
                Cell::Date(date) => match excel_date(*date) {
                    Some(value) => {
                        worksheet.write_datetime_with_format(
                            excel_row,
                            excel_col,
                            &value,
                            &date_format,
                        )?;
                    }
                    None => {
                        let text = date.format("%Y-%m-%d").to_string();
                        worksheet.write_string(excel_row, excel_col, text)?;
                    }
                },
            }
        }
    }
    Ok(())
}

/// `None` for dates Excel cannot store (before 1900 or after 9999).
fn excel_date(date: NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(date.year()).ok()?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
}
