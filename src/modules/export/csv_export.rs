//! CSV Export

use std::path::Path;

use crate::infrastructure::ethereum::ChainEntry;

/// Write chain entries to CSV file
pub fn write_entries(
    path: &Path,
    entries: &[ChainEntry],
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["index", "sender", "phrase", "keyword", "timestamp"])?;

    for entry in entries {
        wtr.write_record([
            entry.index.to_string(),
            entry.sender.to_string(),
            entry.phrase.clone(),
            entry.keyword.clone(),
            entry.timestamp.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(entries.len())
}
