use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use chrono::{Duration, NaiveDate};

use crate::trial_balance::error::{Result, ToolError};
use crate::trial_balance::io::{GridSource, SheetSelector};
use crate::trial_balance::model::{Cell, RawGrid};

/// Largest serial Excel can display as a date (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// An `.xlsx` workbook opened for reading.
pub struct ExcelWorkbook {
    workbook: Xlsx<BufReader<File>>,
}

/// A sheet read back together with the position of its top-left used cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedSheet {
    pub name: String,
    /// Zero-based `(row, column)` of the first cell of `grid`.
    pub origin: (u32, u32),
    pub grid: RawGrid,
}

impl ExcelWorkbook {
    pub fn open(path: &Path) -> Result<Self> {
        let workbook: Xlsx<_> = open_workbook(path)?;
        Ok(Self { workbook })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// Reads every sheet, keeping each sheet's offset so it can be written
    /// back in place.
    pub fn read_all(&mut self) -> Result<Vec<PositionedSheet>> {
        let mut sheets = Vec::new();
        for name in self.sheet_names() {
            let range = self.range(&SheetSelector::name(name.as_str()))?;
            sheets.push(PositionedSheet {
                origin: range.start().unwrap_or((0, 0)),
                grid: range_to_grid(&range),
                name,
            });
        }
        Ok(sheets)
    }

    fn range(&mut self, selector: &SheetSelector) -> Result<Range<DataType>> {
        let range_result = match selector {
            SheetSelector::Name(name) => self
                .workbook
                .worksheet_range(name)
                .ok_or_else(|| ToolError::MissingSheet(name.clone()))?,
            SheetSelector::Index(idx) => self
                .workbook
                .worksheet_range_at(*idx)
                .ok_or(ToolError::SheetIndexOutOfRange(*idx))?,
        };
        let range = range_result.map_err(ToolError::from)?;
        Ok(range)
    }
}

impl GridSource for ExcelWorkbook {
    fn read_grid(&mut self, selector: &SheetSelector) -> Result<RawGrid> {
        let range = self.range(selector)?;
        Ok(range_to_grid(&range))
    }
}

fn range_to_grid(range: &Range<DataType>) -> RawGrid {
    range
        .rows()
        .map(|row| row.iter().map(to_cell).collect())
        .collect()
}

fn to_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::DateTime(serial) => serial_to_date(*serial)
            .map(Cell::Date)
            .unwrap_or(Cell::Number(*serial)),
        other => Cell::Text(other.to_string()),
    }
}

/// Converts an Excel 1900-system serial into a calendar date, dropping the
/// time of day. Serials below 1 are times without a date.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}
