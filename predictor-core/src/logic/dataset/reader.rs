use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::error::{DataError, DatasetError};
use crate::logic::dataset::record::DatasetRow;
use crate::logic::features::DATASET_HEADER;

/// Load a training dataset from a CSV file
pub fn load_csv_file(path: &Path) -> Result<Vec<DatasetRow>, DatasetError> {
    let file = File::open(path)?;
    let rows = from_reader(BufReader::new(file))?;
    log::info!("Dataset loaded: {} records from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse CSV rows, checking the header holds exactly the dataset columns
pub fn from_reader<R: io::Read>(reader: R) -> Result<Vec<DatasetRow>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    check_header(headers.iter())?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: DatasetRow = result?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(DataError::Empty.into());
    }
    Ok(rows)
}

fn check_header<'a>(found: impl Iterator<Item = &'a str>) -> Result<(), DataError> {
    let mut found: Vec<&str> = found.collect();
    let mut expected: Vec<&str> = DATASET_HEADER.to_vec();

    let original = found.join(",");
    found.sort_unstable();
    expected.sort_unstable();

    if found != expected {
        return Err(DataError::SchemaMismatch {
            expected: DATASET_HEADER.join(","),
            found: original,
        });
    }
    Ok(())
}
