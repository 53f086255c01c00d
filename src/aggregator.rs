use chrono::{NaiveDate, Timelike};
use std::collections::HashMap;

use crate::flights::FlightRecord;
use crate::stats::{NewDailyStat, StatKind};

/// Compute all three statistic kinds for one date from the day's raw
/// records.
///
/// The key space is never truncated: "top" destinations and airlines are a
/// presentation concern, the full counts are stored. Hourly buckets are
/// emitted for all 24 hours, zero-filled, so downstream histograms are
/// total-stable. An empty day yields no rows at all, which keeps an
/// empty date distinguishable from zero traffic in a bucket.
pub fn compute_daily_stats(stat_date: NaiveDate, records: &[FlightRecord]) -> Vec<NewDailyStat> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut stats = Vec::new();

    let mut by_destination: HashMap<&str, i64> = HashMap::new();
    let mut by_airline: HashMap<&str, i64> = HashMap::new();
    let mut by_hour = [0i64; 24];

    for record in records {
        *by_destination.entry(record.destination.as_str()).or_default() += 1;
        *by_airline.entry(record.airline.as_str()).or_default() += 1;
        by_hour[record.scheduled_time.hour() as usize] += 1;
    }

    stats.extend(counts_to_stats(stat_date, StatKind::TopDestination, by_destination));
    stats.extend(counts_to_stats(stat_date, StatKind::TopAirline, by_airline));

    for (hour, &count) in by_hour.iter().enumerate() {
        stats.push(NewDailyStat {
            stat_date,
            kind: StatKind::HourlyBucket,
            key: hour.to_string(),
            value: count,
        });
    }

    stats
}

/// Deterministic row order: count descending, then key ascending. Running
/// the aggregator twice over unchanged data yields identical rows.
fn counts_to_stats(
    stat_date: NaiveDate,
    kind: StatKind,
    counts: HashMap<&str, i64>,
) -> Vec<NewDailyStat> {
    let mut pairs: Vec<(&str, i64)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    pairs
        .into_iter()
        .map(|(key, value)| NewDailyStat {
            stat_date,
            kind,
            key: key.to_string(),
            value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flights::FlightStatus;
    use chrono::{NaiveDate, Utc};

    fn record(flight: &str, airline: &str, dest: &str, hour: u32, minute: u32) -> FlightRecord {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        FlightRecord {
            id: 0,
            airport: "chopin".to_string(),
            flight_number: flight.to_string(),
            airline: airline.to_string(),
            destination: dest.to_string(),
            scheduled_time: day.and_hms_opt(hour, minute, 0).unwrap(),
            scrape_date: day,
            status: FlightStatus::OnTime,
            created_at: Utc::now(),
        }
    }

    fn stat_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn values_for(stats: &[NewDailyStat], kind: StatKind) -> Vec<&NewDailyStat> {
        stats.iter().filter(|s| s.kind == kind).collect()
    }

    #[test]
    fn test_empty_day_produces_no_rows() {
        assert!(compute_daily_stats(stat_day(), &[]).is_empty());
    }

    #[test]
    fn test_hourly_buckets_sum_to_record_count() {
        let records = vec![
            record("LO123", "LOT", "JFK", 14, 5),
            record("LO125", "LOT", "ORD", 14, 45),
            record("FR800", "Ryanair", "Dublin", 6, 20),
        ];
        let stats = compute_daily_stats(stat_day(), &records);

        let hourly = values_for(&stats, StatKind::HourlyBucket);
        assert_eq!(hourly.len(), 24, "all 24 buckets present");
        let total: i64 = hourly.iter().map(|s| s.value).sum();
        assert_eq!(total, records.len() as i64);

        let hour_14 = hourly.iter().find(|s| s.key == "14").unwrap();
        assert_eq!(hour_14.value, 2);
        let hour_3 = hourly.iter().find(|s| s.key == "3").unwrap();
        assert_eq!(hour_3.value, 0);
    }

    #[test]
    fn test_destination_and_airline_counts_are_full_coverage() {
        let records = vec![
            record("LO123", "LOT", "JFK", 14, 5),
            record("LO125", "LOT", "ORD", 16, 0),
            record("FR800", "Ryanair", "Dublin", 6, 20),
        ];
        let stats = compute_daily_stats(stat_day(), &records);

        let destinations = values_for(&stats, StatKind::TopDestination);
        assert_eq!(destinations.len(), 3, "every observed destination stored");
        let dest_total: i64 = destinations.iter().map(|s| s.value).sum();
        assert_eq!(dest_total, records.len() as i64);

        let airlines = values_for(&stats, StatKind::TopAirline);
        assert_eq!(airlines.len(), 2);
        assert_eq!(airlines[0].key, "LOT");
        assert_eq!(airlines[0].value, 2);
    }

    #[test]
    fn test_worked_example_single_deduped_flight() {
        // One committed record for LO123 at 14:05 -> hour 14 bucket is 1
        let records = vec![record("LO123", "LOT", "JFK", 14, 5)];
        let stats = compute_daily_stats(stat_day(), &records);

        let hourly = values_for(&stats, StatKind::HourlyBucket);
        assert_eq!(hourly.iter().find(|s| s.key == "14").unwrap().value, 1);
        assert_eq!(hourly.iter().map(|s| s.value).sum::<i64>(), 1);
    }

    #[test]
    fn test_recomputation_is_deterministic() {
        let records = vec![
            record("LO123", "LOT", "JFK", 14, 5),
            record("FR800", "Ryanair", "Dublin", 6, 20),
            record("W61234", "Wizz Air", "Rome", 6, 40),
        ];
        let first = compute_daily_stats(stat_day(), &records);
        let second = compute_daily_stats(stat_day(), &records);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ties_break_on_key_order() {
        let records = vec![
            record("A1", "Alpha", "Zurich", 10, 0),
            record("B1", "Beta", "Athens", 11, 0),
        ];
        let stats = compute_daily_stats(stat_day(), &records);
        let destinations = values_for(&stats, StatKind::TopDestination);
        assert_eq!(destinations[0].key, "Athens");
        assert_eq!(destinations[1].key, "Zurich");
    }
}
