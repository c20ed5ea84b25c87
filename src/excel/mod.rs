//! Spreadsheet import
//!
//! Reads any workbook format calamine understands (xlsx, xlsm, xlsb, xls, ods)
//! into a `WideTable`.

mod importer;

pub use importer::{load, wide_table_from_range, LoadOptions, WorkbookLoader, DEFAULT_LABEL_COLUMN};
