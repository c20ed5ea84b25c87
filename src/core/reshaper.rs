//! Wide → long reshape

use crate::core::dates;
use crate::error::{CellErrorContext, TidyError, TidyResult};
use crate::types::{LongRecord, TidyTable, WideTable};
use chrono::NaiveDate;
use tracing::debug;

/// Reshape a wide table into one record per (row, column) cell.
///
/// Records come out row by row, columns in sheet order. Every header is
/// resolved to its month-end date before any record is built, and any bad
/// header or value fails the whole reshape.
pub fn reshape(wide: WideTable) -> TidyResult<TidyTable> {
    let period_ends = resolve_headers(wide.headers())?;

    let mut records = Vec::with_capacity(wide.cell_count());
    for row in wide.rows() {
        for ((header, period_end), value) in wide.headers().iter().zip(&period_ends).zip(&row.values)
        {
            check_value(*value).map_err(|e| {
                TidyError::Conversion(CellErrorContext::new(header.as_str(), e).with_label(&row.label))
            })?;
            // -0.0 + 0.0 == +0.0, so a negative-zero cell is written as 0
            records.push(LongRecord::new(row.label.clone(), *period_end, *value + 0.0));
        }
    }

    debug!(
        rows = wide.row_count(),
        columns = wide.column_count(),
        records = records.len(),
        "reshaped wide table"
    );

    Ok(TidyTable::from_records(records))
}

/// Resolve every header token to its month-end date, in column order
pub fn resolve_headers(headers: &[String]) -> TidyResult<Vec<NaiveDate>> {
    headers
        .iter()
        .map(|header| {
            dates::header_to_period_end(header)
                .map_err(|e| TidyError::Conversion(CellErrorContext::new(header.as_str(), e)))
        })
        .collect()
}

/// Dispensing counts must be finite and non-negative
fn check_value(value: f64) -> Result<(), String> {
    if !value.is_finite() {
        Err(format!("Value {} is not a finite number", value))
    } else if value < 0.0 {
        Err(format!("Value {} is negative", value))
    } else {
        Ok(())
    }
}
