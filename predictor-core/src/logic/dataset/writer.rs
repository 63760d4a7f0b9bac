use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::DatasetError;
use crate::logic::dataset::record::StudentRecord;

/// Writes generated records as a headered CSV file
pub struct DatasetWriter {
    path: PathBuf,
}

impl DatasetWriter {
    pub fn new() -> Self {
        Self::from_path(crate::constants::get_dataset_path())
    }

    pub fn from_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all records, replacing any existing file.
    /// Returns the number of rows written.
    pub fn write_all(&self, records: &[StudentRecord]) -> Result<usize, DatasetError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = fs::File::create(&self.path)?;
        to_writer(io::BufWriter::new(file), records)?;

        log::info!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(records.len())
    }
}

impl Default for DatasetWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize records (header + rows) into any writer
pub fn to_writer<W: io::Write>(writer: W, records: &[StudentRecord]) -> Result<(), DatasetError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Serialize records into an in-memory CSV buffer
pub fn to_bytes(records: &[StudentRecord]) -> Result<Vec<u8>, DatasetError> {
    let mut buffer = Vec::new();
    to_writer(&mut buffer, records)?;
    Ok(buffer)
}
