use crate::error::{TidyError, TidyResult};
use crate::types::TidyTable;
use std::fs::{self, Permissions};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Header row of the tidy CSV
pub const CSV_HEADER: [&str; 3] = ["Label", "PeriodEnd", "Value"];

/// Writes a tidy table as `Label,PeriodEnd,Value` CSV
pub struct CsvExporter {
    destination: PathBuf,
}

impl CsvExporter {
    pub fn new<P: AsRef<Path>>(destination: P) -> Self {
        Self {
            destination: destination.as_ref().to_path_buf(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Write all records, replacing the destination atomically.
    ///
    /// Rows go to a temp file next to the destination which is renamed into
    /// place once complete. On failure the temp file is removed and the
    /// destination is left as it was. An existing destination keeps its
    /// permissions; a new one gets 0644 on unix.
    pub fn write(&self, table: &TidyTable) -> TidyResult<()> {
        let dir = match self.destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir).map_err(|e| self.error(e))?;
        if let Some(permissions) = self.target_permissions() {
            temp.as_file()
                .set_permissions(permissions)
                .map_err(|e| self.error(e))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp);
        writer
            .write_record(CSV_HEADER)
            .map_err(|e| self.error(e.into()))?;
        for record in table {
            writer.serialize(record).map_err(|e| self.error(e.into()))?;
        }

        let temp = writer.into_inner().map_err(|e| self.error(e.into_error()))?;
        temp.as_file().sync_all().map_err(|e| self.error(e))?;
        temp.persist(&self.destination)
            .map_err(|e| self.error(e.error))?;

        debug!(
            destination = %self.destination.display(),
            records = table.len(),
            "wrote tidy csv"
        );
        Ok(())
    }

    /// Mode the written file should end up with (temp files start as 0600)
    fn target_permissions(&self) -> Option<Permissions> {
        match fs::metadata(&self.destination) {
            Ok(meta) if meta.is_file() => Some(meta.permissions()),
            _ => default_permissions(),
        }
    }

    fn error(&self, source: std::io::Error) -> TidyError {
        TidyError::write(&self.destination, source)
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}
