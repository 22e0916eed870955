//! JSON Export

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::infrastructure::ethereum::ChainEntry;

#[derive(Serialize)]
struct ExportableEntry<'a> {
    index: usize,
    sender: String,
    phrase: &'a str,
    keyword: &'a str,
    timestamp: u64,
    /// RFC 3339, UTC
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<String>,
}

impl<'a> From<&'a ChainEntry> for ExportableEntry<'a> {
    fn from(entry: &'a ChainEntry) -> Self {
        Self {
            index: entry.index,
            sender: entry.sender.to_string(),
            phrase: &entry.phrase,
            keyword: &entry.keyword,
            timestamp: entry.timestamp,
            time: i64::try_from(entry.timestamp)
                .ok()
                .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
                .map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Write chain entries to a pretty-printed JSON array
pub fn write_entries(
    path: &Path,
    entries: &[ChainEntry],
) -> Result<usize, Box<dyn std::error::Error>> {
    let exportable: Vec<ExportableEntry> = entries.iter().map(ExportableEntry::from).collect();
    let json = serde_json::to_string_pretty(&exportable)?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;

    Ok(entries.len())
}
