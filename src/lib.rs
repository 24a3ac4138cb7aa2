//! Core library for the tb-processor command line application.
//!
//! Monthly Balance Sheet and Income Statement exports are loaded one sheet at
//! a time, their header rows located and month columns normalised, and the
//! per-month tables merged into one account-by-month matrix per statement
//! type. Spreadsheet adapters live under [`trial_balance::io`], the data
//! representations inside [`trial_balance::model`], sheet cleanup in
//! [`trial_balance::loader`], the join in [`trial_balance::merge`], and the
//! end-to-end orchestration under [`trial_balance::combine`].

pub mod trial_balance;

pub use trial_balance::{
    Result, ToolError, combine, config, discovery, error, file_date, header, io, loader, logging,
    merge, model, normalize,
};
