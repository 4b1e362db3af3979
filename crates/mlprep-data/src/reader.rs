//! Delimited text file reading.

use csv::{ReaderBuilder, Trim};
use mlprep_core::error::DataError;
use mlprep_core::traits::RawFrame;
use std::path::Path;
use tracing::debug;

/// Convert a csv error, keeping I/O failures distinct.
pub(crate) fn csv_error(err: csv::Error) -> DataError {
    if !err.is_io_error() {
        return DataError::Parse(err.to_string());
    }
    match err.into_kind() {
        csv::ErrorKind::Io(io) => DataError::Io(io),
        kind => DataError::Parse(format!("{:?}", kind)),
    }
}

/// Read a headed, delimited text file into a frame of string cells.
///
/// `separator` must be a single byte. Cells are trimmed; every row must have
/// as many fields as the header.
pub fn read_frame(path: &Path, separator: &str) -> Result<RawFrame, DataError> {
    let delimiter = match separator.as_bytes() {
        [byte] => *byte,
        _ => {
            return Err(DataError::Parse(format!(
                "Separator must be a single byte, got {:?}",
                separator
            )))
        }
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect::<Vec<_>>())
                .map_err(csv_error)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Read {} rows x {} columns from {}",
        rows.len(),
        columns.len(),
        path.display()
    );
    Ok(RawFrame::new(columns, rows))
}
