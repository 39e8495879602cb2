//! CSV exporter

use crate::output::traits::{project_row, RecordExporter};
use crate::record::{Field, Record};
use crate::{ConfigError, HarvestError, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes records as CSV to any writer
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvExporter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| HarvestError::Io(e.into_error()))
    }
}

impl<W: Write> RecordExporter for CsvExporter<W> {
    fn export(&mut self, columns: &[Field], records: &[Record]) -> Result<()> {
        self.writer.write_record(columns.iter().map(Field::name))?;
        for record in records {
            self.writer.write_record(project_row(record, columns))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Exports records to a CSV file, truncating any existing file
///
/// # Arguments
///
/// * `path` - Output file; an empty path is a configuration error
/// * `columns` - Column order and membership
/// * `records` - Records in discovery order
pub fn write_csv_file(path: &Path, columns: &[Field], records: &[Record]) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("Output file is not specified".to_string()).into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut exporter = CsvExporter::new(file);
    exporter.export(columns, records)?;
    exporter.into_inner()?;

    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
