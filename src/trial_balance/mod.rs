pub mod combine;
pub mod config;
pub mod discovery;
pub mod error;
pub mod file_date;
pub mod header;
pub mod io;
pub mod loader;
pub mod logging;
pub mod merge;
pub mod model;
pub mod normalize;

pub use error::{Result, ToolError};
