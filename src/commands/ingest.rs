use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;
use tracing::{info, warn};

use flightboard::config::PipelineConfig;
use flightboard::flights_repo::FlightsRepository;
use flightboard::normalizer::normalize_batch;
use flightboard::scrape::load_batch;
use flightboard::web::PgPool;

/// Normalizer run for one scrape date: load the collector's batch file,
/// normalize and deduplicate it, and commit it to the raw store atomically.
///
/// Per-record problems are reported in the batch summary and never abort
/// the run; store or transaction failures propagate to the scheduler.
pub async fn handle_ingest(
    pool: PgPool,
    config: &PipelineConfig,
    date: NaiveDate,
    input: &Path,
) -> Result<()> {
    let entries = load_batch(input)?;
    let batch_size = entries.len();

    let outcome = normalize_batch(config, &entries, date);
    debug_assert_eq!(outcome.accounted_for(), batch_size);

    let repo = FlightsRepository::new(pool);
    let committed = repo.replace_day(date, outcome.records).await?;

    info!(
        "Ingest summary for {}: {} entries in, {} committed, {} rejected, {} duplicates discarded",
        date,
        batch_size,
        committed,
        outcome.rejections.len(),
        outcome.duplicates_discarded
    );
    for rejection in &outcome.rejections {
        warn!(
            "Rejected entry #{} ({}): {}",
            rejection.index,
            rejection.flight_number.as_deref().unwrap_or("?"),
            rejection.reason
        );
    }

    if committed == 0 && batch_size == 0 {
        warn!("Empty scraped batch for {} - nothing committed", date);
    }

    Ok(())
}
