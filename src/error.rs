use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type TidyResult<T> = Result<T, TidyError>;

/// Location and cause of a bad cell or header
#[derive(Debug, Clone, PartialEq)]
pub struct CellErrorContext {
    /// Row label, if the problem is tied to a single row
    pub label: Option<String>,
    /// Column header token as it appeared in the sheet
    pub header: String,
    pub error: String,
}

impl CellErrorContext {
    pub fn new(header: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            label: None,
            header: header.into(),
            error: error.into(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Format as a single human-readable line
    pub fn format_error(&self) -> String {
        match &self.label {
            Some(label) => format!("{} (row '{}', column '{}')", self.error, label, self.header),
            None => format!("{} (column '{}')", self.error, self.header),
        }
    }
}

impl fmt::Display for CellErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_error())
    }
}

/// Error taxonomy exposed to callers that branch on failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LoadError,
    ConversionError,
    WriteError,
}

#[derive(Error, Debug)]
pub enum TidyError {
    #[error("Load error: {0}")]
    Load(String),

    #[error("Load error: {0}")]
    LoadCell(CellErrorContext),

    #[error("Conversion error: {0}")]
    Conversion(CellErrorContext),

    #[error("Write error ({}): {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TidyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TidyError::Load(_) | TidyError::LoadCell(_) => ErrorKind::LoadError,
            TidyError::Conversion(_) => ErrorKind::ConversionError,
            TidyError::Write { .. } => ErrorKind::WriteError,
        }
    }

    /// Cell context for errors that point at a specific cell or header
    pub fn cell(&self) -> Option<&CellErrorContext> {
        match self {
            TidyError::LoadCell(ctx) | TidyError::Conversion(ctx) => Some(ctx),
            _ => None,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TidyError::Write {
            path: path.into(),
            source,
        }
    }
}
