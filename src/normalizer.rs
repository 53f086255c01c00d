use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::errors::RejectReason;
use crate::flights::{FlightStatus, NewFlightRecord};
use crate::scrape::ScrapedEntry;

/// A rejected entry plus why. Kept per record so the batch summary can name
/// what the collector produced rather than just counting.
#[derive(Debug, Clone)]
pub struct Rejection {
    /// Position in the input batch.
    pub index: usize,
    pub flight_number: Option<String>,
    pub reason: RejectReason,
}

/// Result of normalizing one scraped batch. Nothing here has touched the
/// database yet; committing is the repository's job.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Validated, deduplicated records in first-seen order.
    pub records: Vec<NewFlightRecord>,
    pub rejections: Vec<Rejection>,
    /// Entries discarded because a later entry in the same batch shared
    /// their natural key (last write wins).
    pub duplicates_discarded: usize,
}

impl BatchOutcome {
    /// Accepted + rejected + in-batch duplicates always equals the input
    /// batch size.
    pub fn accounted_for(&self) -> usize {
        self.records.len() + self.rejections.len() + self.duplicates_discarded
    }
}

/// Parse a raw schedule string against the ordered strategy list: RFC 3339
/// first, then the configured full date-time formats, then the time-of-day
/// formats combined with the scrape date. First match wins.
pub fn parse_scheduled_time(
    config: &PipelineConfig,
    raw: &str,
    scrape_date: NaiveDate,
) -> Option<NaiveDateTime> {
    // An RFC 3339 offset is the airport's own, so dropping it yields wall time.
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }

    for format in &config.datetime_formats {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    for format in &config.time_formats {
        if let Ok(time) = NaiveTime::parse_from_str(raw, format) {
            return Some(scrape_date.and_time(time));
        }
    }

    None
}

/// Trim, collapse internal whitespace, then either resolve a configured
/// alias (matched case-insensitively) or fix the board's shouting: words
/// longer than three characters in all caps become title case, short
/// all-caps words are kept as airport/airline codes.
pub fn canonicalize_name(raw: &str, aliases: &HashMap<String, String>) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    if let Some(canonical) = aliases.get(&collapsed.to_lowercase()) {
        return canonical.clone();
    }

    collapsed
        .split(' ')
        .map(|word| {
            let is_shouted = word.len() > 3
                && word.chars().all(|c| !c.is_alphabetic() || c.is_uppercase());
            if is_shouted {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map a raw board status through the configured alias table. Anything the
/// table does not know collapses to `unknown`.
pub fn parse_status(config: &PipelineConfig, raw: Option<&str>) -> FlightStatus {
    let Some(raw) = raw else {
        return FlightStatus::Unknown;
    };
    let normalized = raw.trim().to_lowercase();
    match config.status_aliases.get(&normalized) {
        Some(token) => FlightStatus::from(token.as_str()),
        None => {
            if !normalized.is_empty() {
                debug!("Unrecognized board status '{raw}', storing as unknown");
            }
            FlightStatus::Unknown
        }
    }
}

/// Normalize one scraped batch for one scrape date.
///
/// Entries missing a flight number or schedule string are rejected, as are
/// entries whose schedule does not parse under any configured format or
/// falls outside the scrape date. Surviving entries are deduplicated on
/// `(flight_number, scheduled_time)` with the later entry winning.
pub fn normalize_batch(
    config: &PipelineConfig,
    entries: &[ScrapedEntry],
    scrape_date: NaiveDate,
) -> BatchOutcome {
    let mut records: Vec<NewFlightRecord> = Vec::new();
    let mut positions: HashMap<(String, NaiveDateTime), usize> = HashMap::new();
    let mut rejections = Vec::new();
    let mut duplicates_discarded = 0;

    for (index, entry) in entries.iter().enumerate() {
        let flight_number = entry
            .flight_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let Some(flight_number) = flight_number else {
            rejections.push(Rejection {
                index,
                flight_number: None,
                reason: RejectReason::MissingFlightNumber,
            });
            continue;
        };

        let raw_time = entry
            .scheduled_time_raw
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let Some(raw_time) = raw_time else {
            rejections.push(Rejection {
                index,
                flight_number: Some(flight_number.to_string()),
                reason: RejectReason::MissingScheduledTime,
            });
            continue;
        };

        let Some(scheduled_time) = parse_scheduled_time(config, raw_time, scrape_date) else {
            rejections.push(Rejection {
                index,
                flight_number: Some(flight_number.to_string()),
                reason: RejectReason::UnparseableTime(raw_time.to_string()),
            });
            continue;
        };

        if scheduled_time.date() != scrape_date {
            rejections.push(Rejection {
                index,
                flight_number: Some(flight_number.to_string()),
                reason: RejectReason::WrongDay(raw_time.to_string()),
            });
            continue;
        }

        let record = NewFlightRecord {
            airport: config.airport.clone(),
            flight_number: flight_number.to_string(),
            airline: canonicalize_name(
                entry.airline.as_deref().unwrap_or(""),
                &config.airline_aliases,
            ),
            destination: canonicalize_name(
                entry.destination.as_deref().unwrap_or(""),
                &config.destination_aliases,
            ),
            scheduled_time,
            scrape_date,
            status: parse_status(config, entry.status_raw.as_deref()),
        };

        // Last write wins within a batch: a re-listed flight overwrites the
        // earlier entry in place, keeping first-seen order.
        match positions.get(&record.dedup_key()) {
            Some(&slot) => {
                records[slot] = record;
                duplicates_discarded += 1;
            }
            None => {
                positions.insert(record.dedup_key(), records.len());
                records.push(record);
            }
        }
    }

    if !rejections.is_empty() {
        warn!(
            "Rejected {} of {} scraped entries for {}",
            rejections.len(),
            entries.len(),
            scrape_date
        );
        for rejection in &rejections {
            debug!(
                "  entry #{} ({}): {}",
                rejection.index,
                rejection.flight_number.as_deref().unwrap_or("?"),
                rejection.reason
            );
        }
    }

    BatchOutcome {
        records,
        rejections,
        duplicates_discarded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        flight: &str,
        airline: &str,
        dest: &str,
        time: &str,
        status: &str,
    ) -> ScrapedEntry {
        ScrapedEntry {
            flight_number: Some(flight.to_string()),
            airline: Some(airline.to_string()),
            destination: Some(dest.to_string()),
            scheduled_time_raw: Some(time.to_string()),
            status_raw: Some(status.to_string()),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_time_format_strategies_in_order() {
        let config = PipelineConfig::default();
        let day = date(2024, 1, 1);

        // board attribute format
        let parsed = parse_scheduled_time(&config, "20240101140500", day).unwrap();
        assert_eq!(parsed, day.and_hms_opt(14, 5, 0).unwrap());

        // ISO without offset
        let parsed = parse_scheduled_time(&config, "2024-01-01T14:05:00", day).unwrap();
        assert_eq!(parsed, day.and_hms_opt(14, 5, 0).unwrap());

        // RFC 3339 keeps the local wall time, dropping the offset
        let parsed = parse_scheduled_time(&config, "2024-01-01T14:05:00+01:00", day).unwrap();
        assert_eq!(parsed, day.and_hms_opt(14, 5, 0).unwrap());

        // bare clock time combines with the scrape date
        let parsed = parse_scheduled_time(&config, "14:05", day).unwrap();
        assert_eq!(parsed, day.and_hms_opt(14, 5, 0).unwrap());

        assert!(parse_scheduled_time(&config, "five past two", day).is_none());
    }

    #[test]
    fn test_canonicalize_collapses_and_fixes_shouting() {
        let aliases = HashMap::new();
        assert_eq!(canonicalize_name("  NOWY   JORK ", &aliases), "Nowy Jork");
        // short all-caps words are codes, untouched
        assert_eq!(canonicalize_name("JFK", &aliases), "JFK");
        assert_eq!(canonicalize_name("Oslo Gardermoen", &aliases), "Oslo Gardermoen");
    }

    #[test]
    fn test_canonicalize_alias_wins() {
        let config = PipelineConfig::default();
        assert_eq!(
            canonicalize_name("LOT POLISH AIRLINES", &config.airline_aliases),
            "LOT"
        );
        assert_eq!(
            canonicalize_name(" lot  polish airlines ", &config.airline_aliases),
            "LOT"
        );
    }

    #[test]
    fn test_status_mapping() {
        let config = PipelineConfig::default();
        assert_eq!(parse_status(&config, Some("ON TIME")), FlightStatus::OnTime);
        assert_eq!(parse_status(&config, Some("opóźniony")), FlightStatus::Delayed);
        assert_eq!(parse_status(&config, Some("odwołany")), FlightStatus::Cancelled);
        assert_eq!(parse_status(&config, Some("boarding")), FlightStatus::Unknown);
        assert_eq!(parse_status(&config, None), FlightStatus::Unknown);
    }

    #[test]
    fn test_batch_accounting_adds_up() {
        let config = PipelineConfig::default();
        let day = date(2024, 1, 1);
        let batch = vec![
            entry("LO123", "LOT", "JFK", "14:05", "on time"),
            entry("", "LOT", "JFK", "14:10", "on time"), // missing flight number
            entry("FR800", "Ryanair", "Dublin", "later today", "on time"), // unparseable
            entry("LH1612", "Lufthansa", "Munich", "06:20", "delayed"),
            entry("W61234", "Wizz Air", "Rome", "2024-01-02T09:00:00", "on time"), // wrong day
        ];

        let outcome = normalize_batch(&config, &batch, day);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.rejections.len(), 3);
        assert_eq!(outcome.duplicates_discarded, 0);
        assert_eq!(outcome.accounted_for(), batch.len());

        let reasons: Vec<_> = outcome.rejections.iter().map(|r| &r.reason).collect();
        assert!(matches!(reasons[0], RejectReason::MissingFlightNumber));
        assert!(matches!(reasons[1], RejectReason::UnparseableTime(_)));
        assert!(matches!(reasons[2], RejectReason::WrongDay(_)));
    }

    #[test]
    fn test_duplicate_keeps_the_later_entry() {
        // The worked example: same flight listed twice, the later status wins
        let config = PipelineConfig::default();
        let day = date(2024, 1, 1);
        let batch = vec![
            entry("LO123", "LOT", "JFK", "14:05", "on time"),
            entry("LO123", "LOT", "JFK", "14:05", "delayed"),
        ];

        let outcome = normalize_batch(&config, &batch, day);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.duplicates_discarded, 1);
        assert_eq!(outcome.accounted_for(), 2);

        let record = &outcome.records[0];
        assert_eq!(record.flight_number, "LO123");
        assert_eq!(record.status, FlightStatus::Delayed);
        assert_eq!(record.scheduled_time, day.and_hms_opt(14, 5, 0).unwrap());
    }

    #[test]
    fn test_same_flight_different_times_are_distinct() {
        let config = PipelineConfig::default();
        let day = date(2024, 1, 1);
        let batch = vec![
            entry("LO123", "LOT", "JFK", "14:05", "on time"),
            entry("LO123", "LOT", "JFK", "18:30", "on time"),
        ];

        let outcome = normalize_batch(&config, &batch, day);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.duplicates_discarded, 0);
    }

    #[test]
    fn test_empty_batch() {
        let config = PipelineConfig::default();
        let outcome = normalize_batch(&config, &[], date(2024, 1, 1));
        assert!(outcome.records.is_empty());
        assert!(outcome.rejections.is_empty());
        assert_eq!(outcome.duplicates_discarded, 0);
    }

    #[test]
    fn test_records_carry_the_configured_airport() {
        let config = PipelineConfig::default();
        let day = date(2024, 1, 1);
        let outcome = normalize_batch(
            &config,
            &[entry("LO123", "LOT", "JFK", "14:05", "on time")],
            day,
        );
        assert_eq!(outcome.records[0].airport, "chopin");
        assert_eq!(outcome.records[0].scrape_date, day);
    }
}
