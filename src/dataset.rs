//! CSV input and output for review batches.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::{Reader, Writer};
use thiserror::Error;
use tracing::debug;

use crate::models::{ClassifiedReview, ReviewRecord};

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 2] = ["ProductID", "ReviewText"];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Input file '{}' not found", .0.display())]
    InputNotFound(PathBuf),
    #[error("CSV file must contain 'ProductID' and 'ReviewText' columns (missing: {})", .missing.join(", "))]
    InputSchemaInvalid { missing: Vec<String> },
    #[error("Malformed input CSV: {0}")]
    InputMalformed(#[from] csv::Error),
    #[error("Failed to read input file: {0}")]
    Io(#[from] io::Error),
    #[error("Could not write results to CSV file '{}': {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Read every review from `path`.
///
/// The whole file is validated and loaded up front, so a bad header or a
/// malformed row is reported before any review is classified. Columns other
/// than the required ones are ignored.
pub fn read_reviews(path: &Path) -> Result<Vec<ReviewRecord>, DatasetError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DatasetError::InputNotFound(path.to_path_buf()),
        _ => DatasetError::Io(e),
    })?;

    let mut reader = Reader::from_reader(file);
    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::InputSchemaInvalid { missing });
    }

    let records = reader
        .deserialize()
        .collect::<Result<Vec<ReviewRecord>, _>>()?;

    debug!("Read {} reviews from {}", records.len(), path.display());
    Ok(records)
}

/// Write classified reviews to `path` with a `ProductID,ReviewText,Sentiment` header.
pub fn write_results(path: &Path, results: &[ClassifiedReview]) -> Result<(), DatasetError> {
    let to_output_error = |source: csv::Error| DatasetError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = Writer::from_path(path).map_err(to_output_error)?;
    for result in results {
        writer.serialize(result).map_err(to_output_error)?;
    }
    writer
        .flush()
        .map_err(|e| to_output_error(csv::Error::from(e)))?;

    debug!("Wrote {} results to {}", results.len(), path.display());
    Ok(())
}
