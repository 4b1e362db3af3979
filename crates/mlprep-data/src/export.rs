//! CSV export of bar tables and datasets.

use csv::Writer;
use mlprep_core::error::DataError;
use mlprep_core::types::{BarTable, Dataset, FeedKind};
use std::path::Path;
use tracing::debug;

use crate::reader::csv_error;

const BAR_COLUMNS: [&str; 6] = ["datetime", "open", "high", "low", "close", "volume"];
const SESSION_COLUMNS: [&str; 2] = ["bar_number", "end_of_day"];

/// Write `table` as CSV.
///
/// Daily tables use `YYYY-MM-DD` dates. Intraday tables use RFC 3339
/// timestamps and carry the session columns.
pub fn write_bar_table(path: &Path, table: &BarTable) -> Result<(), DataError> {
    let intraday = table.kind == FeedKind::Intraday;
    let mut writer = Writer::from_path(path).map_err(csv_error)?;

    let mut header: Vec<&str> = BAR_COLUMNS.to_vec();
    if intraday {
        header.extend(SESSION_COLUMNS);
    }
    writer.write_record(&header).map_err(csv_error)?;

    for bar in table.iter() {
        let datetime = match table.kind {
            FeedKind::Daily => bar.timestamp.format("%Y-%m-%d").to_string(),
            FeedKind::Intraday => bar.timestamp.to_rfc3339(),
        };
        let mut record = vec![
            datetime,
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ];
        if intraday {
            let session = bar.session.unwrap_or_default();
            record.push(session.bar_number.to_string());
            record.push(session.end_of_day.to_string());
        }
        writer.write_record(&record).map_err(csv_error)?;
    }

    writer.flush()?;
    debug!("Wrote {} bars of {} to {}", table.len(), table.symbol, path.display());
    Ok(())
}

/// Write `data` as CSV, with the labels in a final `target` column when
/// the dataset is labeled.
pub fn write_dataset(path: &Path, data: &Dataset, target: &str) -> Result<(), DataError> {
    let mut writer = Writer::from_path(path).map_err(csv_error)?;

    let mut header: Vec<&str> = data.feature_names().iter().map(String::as_str).collect();
    if data.has_labels() {
        header.push(target);
    }
    writer.write_record(&header).map_err(csv_error)?;

    for i in 0..data.n_samples() {
        let mut record: Vec<String> = data.row(i).iter().map(|v| v.to_string()).collect();
        if data.has_labels() {
            record.push(data.labels()[i].to_string());
        }
        writer.write_record(&record).map_err(csv_error)?;
    }

    writer.flush()?;
    debug!("Wrote {} rows to {}", data.n_samples(), path.display());
    Ok(())
}
