//! rx-tidy - wide → tidy reshape for monthly dispensing spreadsheets
//!
//! Reads a workbook whose first column (`DRUG_NAME`) labels each row and
//! whose remaining column headers are spreadsheet serial dates, and turns it
//! into one `(label, month-end date, value)` record per cell.
//!
//! # Example
//!
//! ```no_run
//! use rx_tidy::core::{reshape, Summary};
//! use rx_tidy::excel::load;
//!
//! let wide = load("dispensing.xlsx")?;
//! let tidy = reshape(wide)?;
//! let summary = Summary::describe(&tidy);
//!
//! println!("{} records", tidy.len());
//! println!("{}", summary);
//!
//! rx_tidy::pipeline::export("dispensing.xlsx", "tidy.csv")?;
//! # Ok::<(), rx_tidy::error::TidyError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod pipeline;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{CellErrorContext, ErrorKind, TidyError, TidyResult};
pub use pipeline::{export, import};
pub use types::{LongRecord, TidyTable, WideRow, WideTable};
