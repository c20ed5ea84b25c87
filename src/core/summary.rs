//! Summary and preview of a tidy table

use crate::types::{format_value, LongRecord, TidyTable};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Rows shown by default when previewing a table
pub const DEFAULT_PREVIEW_ROWS: usize = 6;

/// Delimiter used when joining labels for display
pub const LABEL_DELIMITER: &str = ", ";

/// Distinct labels and the covered period range of a tidy table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Distinct labels, ascending byte order (case and whitespace significant)
    pub labels: Vec<String>,
    pub first_period: Option<NaiveDate>,
    pub last_period: Option<NaiveDate>,
    pub records: usize,
}

impl Summary {
    pub fn describe(table: &TidyTable) -> Self {
        let labels: BTreeSet<&str> = table.iter().map(|r| r.label.as_str()).collect();
        let first_period = table.iter().map(|r| r.period_end).min();
        let last_period = table.iter().map(|r| r.period_end).max();

        Self {
            labels: labels.into_iter().map(str::to_string).collect(),
            first_period,
            last_period,
            records: table.len(),
        }
    }

    /// `(min, max)` of period ends, `None` for an empty table
    pub fn period_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.first_period.zip(self.last_period)
    }

    pub fn labels_joined(&self, delimiter: &str) -> String {
        self.labels.join(delimiter)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Labels: {}", self.labels_joined(LABEL_DELIMITER))?;
        match self.period_range() {
            Some((first, last)) => writeln!(f, "Periods: {} to {}", first, last)?,
            None => writeln!(f, "Periods: none")?,
        }
        write!(f, "Records: {}", self.records)
    }
}

/// Render records as aligned `Label  PeriodEnd  Value` lines
pub fn format_preview(records: &[LongRecord]) -> String {
    let label_width = records
        .iter()
        .map(|r| r.label.chars().count())
        .chain(std::iter::once("Label".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!("{:<label_width$}  {:<10}  Value\n", "Label", "PeriodEnd");
    for record in records {
        out.push_str(&format!(
            "{:<label_width$}  {}  {}\n",
            record.label,
            record.period_end,
            format_value(record.value)
        ));
    }
    out
}
