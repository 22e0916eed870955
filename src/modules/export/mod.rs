//! Export Module
//!
//! Writes the loaded message chain to disk.
//!
//! - 'e' exports CSV, 'E' exports JSON
//! - Files saved to `<data dir>/exports/chain-<timestamp>.<ext>`

mod csv_export;
mod json_export;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::core::{Action, ExportFormat, NotifyLevel};
use crate::infrastructure::ethereum::ChainEntry;

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Write `entries` into `dir` and return the created file
pub fn write_chain(
    dir: &Path,
    entries: &[ChainEntry],
    format: ExportFormat,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;
    let path = dir.join(generate_filename("chain", format.extension()));
    match format {
        ExportFormat::Csv => csv_export::write_entries(&path, entries)?,
        ExportFormat::Json => json_export::write_entries(&path, entries)?,
    };
    Ok(path)
}

/// Export the chain and describe the outcome for the status line
pub fn export_chain(dir: &Path, entries: &[ChainEntry], format: ExportFormat) -> Action {
    if entries.is_empty() {
        return Action::Notify(
            "No chain entries to export".to_string(),
            NotifyLevel::Warn,
        );
    }

    match write_chain(dir, entries, format) {
        Ok(path) => {
            tracing::info!(path = %path.display(), entries = entries.len(), "chain exported");
            Action::Notify(
                format!("Exported {} entries to {}", entries.len(), path.display()),
                NotifyLevel::Info,
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "chain export failed");
            Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error)
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;

    use super::*;

    fn entries() -> Vec<ChainEntry> {
        vec![
            ChainEntry {
                index: 0,
                sender: Address::repeat_byte(0x01),
                phrase: "hello world".to_string(),
                keyword: "world".to_string(),
                timestamp: 1_700_000_000,
            },
            ChainEntry {
                index: 1,
                sender: Address::repeat_byte(0x02),
                phrase: "world, peace".to_string(),
                keyword: "peace".to_string(),
                timestamp: 1_700_000_060,
            },
        ]
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("keywordchain-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_csv_export_writes_rows() {
        let dir = scratch_dir("csv");
        let path = write_chain(&dir, &entries(), ExportFormat::Csv).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "index,sender,phrase,keyword,timestamp");
        assert_eq!(lines.len(), 3);
        // Commas inside a phrase are quoted
        assert!(lines[2].contains("\"world, peace\""));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_json_export_is_array() {
        let dir = scratch_dir("json");
        let path = write_chain(&dir, &entries(), ExportFormat::Json).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[1]["keyword"], "peace");
        assert_eq!(array[0]["timestamp"], 1_700_000_000u64);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_export_empty_chain_warns() {
        let action = export_chain(&scratch_dir("empty"), &[], ExportFormat::Csv);
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Warn)));
    }
}
