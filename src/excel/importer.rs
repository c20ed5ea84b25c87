//! Workbook loader - spreadsheet → WideTable

use crate::core::dates;
use crate::error::{CellErrorContext, TidyError, TidyResult};
use crate::types::{WideRow, WideTable};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header of the label column in dispensing extracts
pub const DEFAULT_LABEL_COLUMN: &str = "DRUG_NAME";

/// Layout options for the source sheet
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Expected header of the first column
    pub label_column: String,
    /// Worksheet to read; the first sheet when `None`
    pub sheet: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            sheet: None,
        }
    }
}

/// Reads one worksheet into a `WideTable`
pub struct WorkbookLoader {
    path: PathBuf,
    options: LoadOptions,
}

impl WorkbookLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// Open the workbook, read the selected sheet and type its columns.
    ///
    /// The workbook handle lives only for the duration of this call.
    pub fn load(&self) -> TidyResult<WideTable> {
        let range = {
            let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
                TidyError::Load(format!(
                    "Failed to open workbook {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

            match &self.options.sheet {
                Some(name) => workbook.worksheet_range(name).map_err(|e| {
                    TidyError::Load(format!("Failed to read sheet '{}': {}", name, e))
                })?,
                None => workbook
                    .worksheet_range_at(0)
                    .ok_or_else(|| TidyError::Load("Workbook has no worksheets".to_string()))?
                    .map_err(|e| TidyError::Load(format!("Failed to read first sheet: {}", e)))?,
            }
        };

        let table = wide_table_from_range(&range, &self.options.label_column)?;
        debug!(
            path = %self.path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded wide table"
        );
        Ok(table)
    }
}

/// Load with default options (first sheet, `DRUG_NAME` label column)
pub fn load<P: AsRef<Path>>(path: P) -> TidyResult<WideTable> {
    WorkbookLoader::new(path).load()
}

/// Build a `WideTable` from a cell grid: header row, then one row per label.
pub fn wide_table_from_range(range: &Range<Data>, label_column: &str) -> TidyResult<WideTable> {
    let mut rows = range.rows();

    let header_row = rows
        .next()
        .ok_or_else(|| TidyError::Load("Sheet is empty".to_string()))?;

    let first_header = header_row.first().map(|c| c.to_string()).unwrap_or_default();
    if first_header.trim() != label_column {
        return Err(TidyError::Load(format!(
            "First column header is '{}', expected '{}'",
            first_header.trim(),
            label_column
        )));
    }

    let headers = header_row[1..]
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_token(cell, idx + 1))
        .collect::<TidyResult<Vec<String>>>()?;
    if headers.is_empty() {
        return Err(TidyError::Load("Sheet has no date columns".to_string()));
    }

    let mut data_rows: Vec<&[Data]> = rows.collect();
    while data_rows
        .last()
        .is_some_and(|row| row.iter().all(|c| matches!(c, Data::Empty)))
    {
        data_rows.pop();
    }
    if data_rows.is_empty() {
        return Err(TidyError::Load("Sheet has no data rows".to_string()));
    }

    let mut wide_rows = Vec::with_capacity(data_rows.len());
    for (row_idx, cells) in data_rows.into_iter().enumerate() {
        let label = row_label(&cells[0], row_idx + 1)?;
        let values = headers
            .iter()
            .zip(&cells[1..])
            .map(|(header, cell)| {
                numeric_value(cell).map_err(|e| {
                    TidyError::LoadCell(CellErrorContext::new(header.as_str(), e).with_label(&label))
                })
            })
            .collect::<TidyResult<Vec<f64>>>()?;
        wide_rows.push(WideRow { label, values });
    }

    WideTable::new(label_column, headers, wide_rows).map_err(TidyError::Load)
}

/// Render a header cell as its serial-date token
fn header_token(cell: &Data, col: usize) -> TidyResult<String> {
    match cell {
        Data::Int(i) => Ok(i.to_string()),
        Data::Float(f) => Ok(f.to_string()),
        Data::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Data::DateTime(dt) => Ok(dt.as_f64().to_string()),
        Data::DateTimeIso(s) => iso_to_serial(s)
            .map(|serial| serial.to_string())
            .ok_or_else(|| TidyError::Load(format!("Unreadable date header '{}'", s))),
        _ => Err(TidyError::Load(format!(
            "Column {} has an empty or invalid header",
            col + 1
        ))),
    }
}

fn iso_to_serial(s: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok()?;
    let epoch = dates::serial_to_date(0)?;
    Some((date - epoch).num_days())
}

fn row_label(cell: &Data, row: usize) -> TidyResult<String> {
    match cell {
        Data::String(s) if !s.is_empty() => Ok(s.clone()),
        Data::Int(_) | Data::Float(_) => Ok(cell.to_string()),
        _ => Err(TidyError::Load(format!("Data row {} has no label", row))),
    }
}

fn numeric_value(cell: &Data) -> Result<f64, String> {
    match cell {
        Data::Float(f) => Ok(*f),
        Data::Int(i) => Ok(*i as f64),
        Data::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Non-numeric value '{}'", s)),
        Data::Empty => Err("Empty cell".to_string()),
        other => Err(format!("Non-numeric value '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: Vec<Vec<Data>>) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_wide_table_from_range() {
        let range = grid(vec![
            vec![s("DRUG_NAME"), Data::Float(44012.0), Data::Int(43982)],
            vec![s("MYDAYIS"), Data::Float(20373.0), Data::Float(20740.0)],
            vec![s("ADDERALL"), Data::Int(5), s(" 7.5 ")],
        ]);

        let table = wide_table_from_range(&range, DEFAULT_LABEL_COLUMN).unwrap();
        assert_eq!(table.headers(), &["44012".to_string(), "43982".to_string()]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get("MYDAYIS", "43982"), Some(20740.0));
        assert_eq!(table.get("ADDERALL", "43982"), Some(7.5));
    }

    #[test]
    fn test_wrong_label_column() {
        let range = grid(vec![
            vec![s("NAME"), Data::Int(44012)],
            vec![s("MYDAYIS"), Data::Int(1)],
        ]);
        let err = wide_table_from_range(&range, DEFAULT_LABEL_COLUMN).unwrap_err();
        assert!(err.to_string().contains("expected 'DRUG_NAME'"));
    }

    #[test]
    fn test_custom_label_column() {
        let range = grid(vec![
            vec![s("PRODUCT"), Data::Int(44012)],
            vec![s("MYDAYIS"), Data::Int(1)],
        ]);
        let table = wide_table_from_range(&range, "PRODUCT").unwrap();
        assert_eq!(table.label_column(), "PRODUCT");
    }

    #[test]
    fn test_non_numeric_cell_names_location() {
        let range = grid(vec![
            vec![s("DRUG_NAME"), Data::Int(44012)],
            vec![s("MYDAYIS"), s("n/a")],
        ]);
        let err = wide_table_from_range(&range, DEFAULT_LABEL_COLUMN).unwrap_err();
        match err {
            TidyError::LoadCell(ctx) => {
                assert_eq!(ctx.label.as_deref(), Some("MYDAYIS"));
                assert_eq!(ctx.header, "44012");
            }
            other => panic!("Expected LoadCell, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_cell_rejected() {
        let range = grid(vec![
            vec![s("DRUG_NAME"), Data::Int(44012), Data::Int(43982)],
            vec![s("MYDAYIS"), Data::Int(1), Data::Empty],
        ]);
        assert!(wide_table_from_range(&range, DEFAULT_LABEL_COLUMN).is_err());
    }

    #[test]
    fn test_header_only_sheet_rejected() {
        let range = grid(vec![vec![s("DRUG_NAME"), Data::Int(44012)]]);
        let err = wide_table_from_range(&range, DEFAULT_LABEL_COLUMN).unwrap_err();
        assert!(err.to_string().contains("no data rows"));
    }

    #[test]
    fn test_no_date_columns_rejected() {
        let range = grid(vec![vec![s("DRUG_NAME")], vec![s("MYDAYIS")]]);
        let err = wide_table_from_range(&range, DEFAULT_LABEL_COLUMN).unwrap_err();
        assert!(err.to_string().contains("no date columns"));
    }

    #[test]
    fn test_trailing_empty_rows_ignored() {
        let range = grid(vec![
            vec![s("DRUG_NAME"), Data::Int(44012)],
            vec![s("MYDAYIS"), Data::Int(1)],
            vec![Data::Empty, Data::Empty],
        ]);
        let table = wide_table_from_range(&range, DEFAULT_LABEL_COLUMN).unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let range = grid(vec![
            vec![s("DRUG_NAME"), Data::Int(44012), Data::Float(44012.0)],
            vec![s("MYDAYIS"), Data::Int(1), Data::Int(2)],
        ]);
        let err = wide_table_from_range(&range, DEFAULT_LABEL_COLUMN).unwrap_err();
        assert!(err.to_string().contains("Duplicate column header"));
    }

    #[test]
    fn test_iso_header_converted_to_serial() {
        let cell = Data::DateTimeIso("2020-06-30T00:00:00".to_string());
        assert_eq!(header_token(&cell, 1).unwrap(), "44012");
    }

    #[test]
    fn test_text_header_kept_for_reshape() {
        // Header validity is decided by reshape, not the loader
        assert_eq!(header_token(&s(" Jun-20 "), 1).unwrap(), "Jun-20");
        assert!(header_token(&Data::Empty, 1).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load("does/not/exist.xlsx").unwrap_err();
        assert!(matches!(err, TidyError::Load(_)));
    }
}
