use std::fmt;

use crate::trial_balance::error::Result;
use crate::trial_balance::model::RawGrid;

pub mod excel_read;
pub mod excel_write;

/// Identifies a sheet either by name or by 0-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Name(String),
    Index(usize),
}

impl SheetSelector {
    pub fn name(name: impl Into<String>) -> Self {
        SheetSelector::Name(name.into())
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Name(name) => write!(f, "'{name}'"),
            SheetSelector::Index(idx) => write!(f, "#{idx}"),
        }
    }
}

/// Anything that can hand out the raw cell grid of a sheet.
///
/// Implementations must fail with [`ToolError::MissingSheet`] or
/// [`ToolError::SheetIndexOutOfRange`] when the requested sheet does not
/// exist.
///
/// [`ToolError::MissingSheet`]: crate::trial_balance::error::ToolError::MissingSheet
/// [`ToolError::SheetIndexOutOfRange`]: crate::trial_balance::error::ToolError::SheetIndexOutOfRange
pub trait GridSource {
    fn read_grid(&mut self, selector: &SheetSelector) -> Result<RawGrid>;
}
