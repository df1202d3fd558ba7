//! CSV output for chart consumers
//!
//! - Levels table: one row per ranked level, with header
//! - History feed: headerless `date,open,high,low,close,volume` rows
//! - Timestamp file: time of the last update

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::core::{GexError, GexResult};
use crate::levels::{HistoryRow, Level};

/// Header of the levels table
pub const LEVEL_HEADER: [&str; 6] = ["strike", "gex_vol", "gex_oi", "type", "importance", "label"];

/// Write the levels table to any writer
pub fn write_levels<W: Write>(out: W, levels: &[Level]) -> GexResult<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(LEVEL_HEADER).map_err(csv_error)?;

    for level in levels {
        writer
            .write_record([
                level.price.to_string(),
                level.volume_metric.to_string(),
                level.open_interest_metric.to_string(),
                level.kind.as_str().to_string(),
                level.importance().to_string(),
                level.label.clone(),
            ])
            .map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write history rows (no header, 6 fields each)
pub fn write_history<W: Write>(out: W, rows: &[HistoryRow]) -> GexResult<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);

    for row in rows {
        writer.write_record(row.to_record()).map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the levels table to a file
pub fn save_levels(path: impl AsRef<Path>, levels: &[Level]) -> GexResult<()> {
    let path = path.as_ref();
    let file = fs::File::create(path)?;
    write_levels(file, levels)?;
    tracing::info!("Saved {} levels to {:?}", levels.len(), path);
    Ok(())
}

/// Write history rows to a file
pub fn save_history(path: impl AsRef<Path>, rows: &[HistoryRow]) -> GexResult<()> {
    let path = path.as_ref();
    let file = fs::File::create(path)?;
    write_history(file, rows)?;
    tracing::info!("Saved {} history rows to {:?}", rows.len(), path);
    Ok(())
}

/// "2025-03-10 14:30:00 UTC"
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn save_timestamp(path: impl AsRef<Path>, at: DateTime<Utc>) -> GexResult<()> {
    fs::write(path, format_timestamp(at))?;
    Ok(())
}

fn csv_error(e: csv::Error) -> GexError {
    GexError::Serialization(e.to_string())
}
