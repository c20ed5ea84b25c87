//! Import / export entry points
//!
//! Each stage is a separate call returning an immutable value:
//! load → reshape → describe → (write).

use crate::core::{format_preview, reshape, Summary, DEFAULT_PREVIEW_ROWS};
use crate::error::TidyResult;
use crate::excel::{LoadOptions, WorkbookLoader};
use crate::types::TidyTable;
use crate::writer::CsvExporter;
use std::path::Path;
use tracing::info;

/// Options for a single import/export run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub load: LoadOptions,
    /// Records included in the preview report
    pub preview_rows: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Load and reshape a dispensing workbook, reporting a preview and summary
pub fn import<P: AsRef<Path>>(path: P) -> TidyResult<TidyTable> {
    import_with(path, &PipelineOptions::default())
}

pub fn import_with<P: AsRef<Path>>(path: P, options: &PipelineOptions) -> TidyResult<TidyTable> {
    let (table, summary) = run(path.as_ref(), options)?;
    report(&table, &summary, options.preview_rows);
    Ok(table)
}

/// Import, then write the tidy table as CSV to `destination`
pub fn export<P: AsRef<Path>, Q: AsRef<Path>>(path: P, destination: Q) -> TidyResult<()> {
    export_with(path, destination, &PipelineOptions::default())
}

pub fn export_with<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    destination: Q,
    options: &PipelineOptions,
) -> TidyResult<()> {
    let table = import_with(path, options)?;
    CsvExporter::new(destination).write(&table)
}

/// Load + reshape + describe, without reporting
pub fn run(path: &Path, options: &PipelineOptions) -> TidyResult<(TidyTable, Summary)> {
    let wide = WorkbookLoader::new(path)
        .with_options(options.load.clone())
        .load()?;
    let table = reshape(wide)?;
    let summary = Summary::describe(&table);
    Ok((table, summary))
}

fn report(table: &TidyTable, summary: &Summary, preview_rows: usize) {
    if preview_rows > 0 {
        info!("preview:\n{}", format_preview(table.preview(preview_rows)));
    }
    info!("summary:\n{}", summary);
}
