use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One loosely-structured entry from the external collector.
///
/// Field names vary across page versions of the departures board, so every
/// field accepts the known spelling variants and everything is optional here;
/// the normalizer decides what is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapedEntry {
    #[serde(default, alias = "flight_no", alias = "flight")]
    pub flight_number: Option<String>,

    #[serde(default, alias = "carrier")]
    pub airline: Option<String>,

    #[serde(default, alias = "dest", alias = "direction")]
    pub destination: Option<String>,

    /// Raw schedule string. Older page versions expose the board's
    /// `data-timesch` attribute, newer ones an ISO timestamp or a bare
    /// clock time.
    #[serde(
        default,
        alias = "scheduled_time",
        alias = "data_timesch",
        alias = "time"
    )]
    pub scheduled_time_raw: Option<String>,

    #[serde(default, alias = "status")]
    pub status_raw: Option<String>,
}

/// Read a scraped batch from a collector output file. JSON files hold an
/// array of entries; CSV files are headered. The extension picks the format.
pub fn load_batch(path: &Path) -> Result<Vec<ScrapedEntry>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let entries = match extension.as_deref() {
        Some("json") => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read batch file {}", path.display()))?;
            serde_json::from_str::<Vec<ScrapedEntry>>(&raw)
                .with_context(|| format!("failed to parse JSON batch {}", path.display()))?
        }
        Some("csv") => {
            let mut reader = csv::Reader::from_path(path)
                .with_context(|| format!("failed to open CSV batch {}", path.display()))?;
            let mut entries = Vec::new();
            for row in reader.deserialize::<ScrapedEntry>() {
                entries.push(
                    row.with_context(|| format!("malformed CSV row in {}", path.display()))?,
                );
            }
            entries
        }
        _ => bail!(
            "unsupported batch file {} - expected a .json or .csv extension",
            path.display()
        ),
    };

    info!("Loaded {} scraped entries from {}", entries.len(), path.display());
    Ok(entries)
}
