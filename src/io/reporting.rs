// src/io/reporting.rs

use crate::error::AnalyticsResult;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes result rows (shortage runs, capacity tables, ...) to a CSV file.
///
/// # Arguments
/// * `file_path` - Destination, e.g. "results/shortages.csv".
/// * `rows` - Anything serializable as a flat record.
pub fn write_records<T: Serialize>(file_path: impl AsRef<Path>, rows: &[T]) -> AnalyticsResult<()> {
    let path = file_path.as_ref();
    let wtr = csv::Writer::from_path(path)?;
    write_all(wtr, rows)?;

    info!(rows = rows.len(), path = %path.display(), "exported rows");
    Ok(())
}

/// Same as [`write_records`] but into any writer.
pub fn write_records_to<W: Write, T: Serialize>(writer: W, rows: &[T]) -> AnalyticsResult<()> {
    write_all(csv::Writer::from_writer(writer), rows)
}

fn write_all<W: Write, T: Serialize>(mut wtr: csv::Writer<W>, rows: &[T]) -> AnalyticsResult<()> {
    for row in rows {
        wtr.serialize(row)?;
    }
    // Flush so the data is on disk before the writer drops
    wtr.flush()?;
    Ok(())
}
