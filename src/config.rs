use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Pipeline configuration, loadable from a TOML file with compiled-in
/// defaults tuned for the Chopin departures board. Every field is optional in
/// the file; anything omitted keeps its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source board identifier stamped on every raw row.
    pub airport: String,

    /// Full date-time formats tried in order against the raw schedule
    /// string, after RFC 3339. First match wins.
    pub datetime_formats: Vec<String>,

    /// Time-of-day formats, combined with the scrape date. Tried after the
    /// full date-time formats.
    pub time_formats: Vec<String>,

    /// Known spelling variants, keyed lowercase: raw form -> canonical form.
    pub airline_aliases: HashMap<String, String>,
    pub destination_aliases: HashMap<String, String>,

    /// Raw board status strings, keyed lowercase, mapping to the canonical
    /// status tokens (`on_time`, `delayed`, `cancelled`).
    pub status_aliases: HashMap<String, String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        // The pairs the Chopin board is known to emit. The source page is
        // bilingual, so both Polish and English variants appear.
        let status_aliases = [
            ("on time", "on_time"),
            ("planowy", "on_time"),
            ("wg rozkladu", "on_time"),
            ("wg rozkładu", "on_time"),
            ("departed", "on_time"),
            ("wylecial", "on_time"),
            ("wyleciał", "on_time"),
            ("delayed", "delayed"),
            ("opozniony", "delayed"),
            ("opóźniony", "delayed"),
            ("cancelled", "cancelled"),
            ("canceled", "cancelled"),
            ("odwolany", "cancelled"),
            ("odwołany", "cancelled"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            airport: "chopin".to_string(),
            datetime_formats: vec![
                // data-timesch attribute on the board rows
                "%Y%m%d%H%M%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M".to_string(),
            ],
            time_formats: vec!["%H:%M".to_string(), "%H.%M".to_string()],
            airline_aliases: [
                ("lot polish airlines", "LOT"),
                ("polskie linie lotnicze lot", "LOT"),
                ("lufthansa german airlines", "Lufthansa"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            destination_aliases: HashMap::new(),
            status_aliases,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file, or fall back to the defaults
    /// when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                let config: PipelineConfig = toml::from_str(&raw)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}
