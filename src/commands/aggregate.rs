use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use flightboard::aggregator::compute_daily_stats;
use flightboard::flights_repo::FlightsRepository;
use flightboard::stats_repo::StatsRepository;
use flightboard::web::PgPool;

/// Aggregator run for one stat date: read the day's raw records, recompute
/// all three statistic kinds, and replace the stored rows in one
/// transaction.
///
/// Assumes the normalizer run for the date already completed - the external
/// scheduler sequences the two. A missing or unreachable store fails the
/// run; retrying is the scheduler's call, not ours.
pub async fn handle_aggregate(pool: PgPool, date: NaiveDate) -> Result<()> {
    let flights = FlightsRepository::new(pool.clone());
    let records = flights.get_for_date(date).await?;

    info!("Aggregating {} flight records for {}", records.len(), date);

    let stats = compute_daily_stats(date, &records);
    if stats.is_empty() {
        info!("No flight records for {} - storing no stat rows", date);
    }

    let stats_repo = StatsRepository::new(pool);
    let stored = stats_repo.replace_for_date(date, stats).await?;

    info!("Aggregation complete for {}: {} stat rows", date, stored);
    Ok(())
}
