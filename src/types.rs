use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

//==============================================================================
// Wide (source) model
//==============================================================================

/// Wide table: one row per label, one numeric column per period header.
///
/// Header tokens are resolved to column positions once, at construction.
/// Row labels may repeat; header tokens may not.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    /// Name of the label column (e.g. `DRUG_NAME`)
    label_column: String,
    /// Ordered header tokens; position is the column index into each row
    headers: Vec<String>,
    /// Header token -> column index
    index: HashMap<String, usize>,
    rows: Vec<WideRow>,
}

/// A single labelled row of cell values, aligned with `WideTable::headers`
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub label: String,
    pub values: Vec<f64>,
}

impl WideTable {
    /// Build a table, checking that every row has one value per header
    /// and that header tokens are unique.
    pub fn new(
        label_column: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<WideRow>,
    ) -> Result<Self, String> {
        let mut index = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            if index.insert(header.clone(), idx).is_some() {
                return Err(format!("Duplicate column header '{}'", header));
            }
        }
        for row in &rows {
            if row.values.len() != headers.len() {
                return Err(format!(
                    "Row '{}' has {} values, expected {}",
                    row.label,
                    row.values.len(),
                    headers.len()
                ));
            }
        }
        Ok(Self {
            label_column: label_column.into(),
            headers,
            index,
            rows,
        })
    }

    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    /// Column index for a header token
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.index.get(header).copied()
    }

    /// Value at (row label, header); first matching row wins for repeated labels
    pub fn get(&self, label: &str, header: &str) -> Option<f64> {
        let col = self.column_index(header)?;
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.values[col])
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of cells (rows x date columns)
    pub fn cell_count(&self) -> usize {
        self.row_count() * self.column_count()
    }
}

//==============================================================================
// Long (tidy) model
//==============================================================================

/// One observation: label, month-end date, value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "PeriodEnd")]
    pub period_end: NaiveDate,
    #[serde(rename = "Value", serialize_with = "plain_decimal")]
    pub value: f64,
}

impl LongRecord {
    pub fn new(label: impl Into<String>, period_end: NaiveDate, value: f64) -> Self {
        Self {
            label: label.into(),
            period_end,
            value,
        }
    }
}

/// Serialize an f64 as plain decimal text (`20373`, `12.5`), never `20373.0`
/// or exponent notation.
fn plain_decimal<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_value(*value))
}

/// Format a value the way it is written to CSV
pub fn format_value(value: f64) -> String {
    format!("{}", value + 0.0)
}

/// Ordered, write-once sequence of long records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TidyTable {
    records: Vec<LongRecord>,
}

impl TidyTable {
    pub fn from_records(records: Vec<LongRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[LongRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LongRecord> {
        self.records.iter()
    }

    /// First `n` records (fewer if the table is shorter)
    pub fn preview(&self, n: usize) -> &[LongRecord] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn into_records(self) -> Vec<LongRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a TidyTable {
    type Item = &'a LongRecord;
    type IntoIter = std::slice::Iter<'a, LongRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, values: &[f64]) -> WideRow {
        WideRow {
            label: label.to_string(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_wide_table_lookup() {
        let table = WideTable::new(
            "DRUG_NAME",
            vec!["44012".to_string(), "43982".to_string()],
            vec![row("MYDAYIS", &[20373.0, 20740.0]), row("ADDERALL", &[1.0, 2.0])],
        )
        .unwrap();

        assert_eq!(table.column_index("43982"), Some(1));
        assert_eq!(table.get("MYDAYIS", "43982"), Some(20740.0));
        assert_eq!(table.get("ADDERALL", "44012"), Some(1.0));
        assert_eq!(table.get("RITALIN", "44012"), None);
        assert_eq!(table.cell_count(), 4);
    }

    #[test]
    fn test_column_index_over_many_headers() {
        let headers: Vec<String> = (0..300).map(|i| (43831 + i).to_string()).collect();
        let table = WideTable::new("DRUG_NAME", headers.clone(), vec![]).unwrap();

        for (idx, header) in headers.iter().enumerate() {
            assert_eq!(table.column_index(header), Some(idx));
        }
        assert_eq!(table.column_index("99999"), None);
    }

    #[test]
    fn test_wide_table_rejects_duplicate_headers() {
        let result = WideTable::new(
            "DRUG_NAME",
            vec!["44012".to_string(), "44012".to_string()],
            vec![row("MYDAYIS", &[1.0, 2.0])],
        );
        assert!(result.unwrap_err().contains("Duplicate column header"));
    }

    #[test]
    fn test_wide_table_rejects_ragged_rows() {
        let result = WideTable::new(
            "DRUG_NAME",
            vec!["44012".to_string()],
            vec![row("MYDAYIS", &[1.0, 2.0])],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_wide_table_allows_repeated_labels() {
        let table = WideTable::new(
            "DRUG_NAME",
            vec!["44012".to_string()],
            vec![row("MYDAYIS", &[1.0]), row("MYDAYIS", &[2.0])],
        )
        .unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(20373.0), "20373");
        assert_eq!(format_value(12.5), "12.5");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(1e20), "100000000000000000000");
        assert_eq!(format_value(-0.0), "0");
    }

    #[test]
    fn test_preview_clamps_to_length() {
        let date = NaiveDate::from_ymd_opt(2020, 6, 30).unwrap();
        let table = TidyTable::from_records(vec![
            LongRecord::new("A", date, 1.0),
            LongRecord::new("B", date, 2.0),
        ]);
        assert_eq!(table.preview(1).len(), 1);
        assert_eq!(table.preview(10).len(), 2);
        assert!(TidyTable::default().preview(3).is_empty());
    }
}
