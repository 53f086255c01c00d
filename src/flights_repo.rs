use anyhow::Result;
use chrono::NaiveDate;
use diesel::prelude::*;
use tracing::info;

use crate::errors::PipelineError;
use crate::flights::{FlightRecord, NewFlightRecord};
use crate::web::PgPool;

/// Sole writer of the raw store. The aggregator and the query layer only
/// read through it.
#[derive(Clone)]
pub struct FlightsRepository {
    pool: PgPool,
}

impl FlightsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Commit one normalized batch for one scrape date.
    ///
    /// Runs as a single transaction that drops the date's previous rows and
    /// inserts the new batch, so a re-ingested day replaces its raw data and
    /// a failure leaves the prior state untouched. Inserts are chunked to
    /// stay under PostgreSQL's bind-parameter limit; the chunks share the
    /// transaction, so atomicity is unaffected.
    pub async fn replace_day(
        &self,
        date: NaiveDate,
        records: Vec<NewFlightRecord>,
    ) -> Result<usize> {
        use crate::schema::flights_raw::dsl::*;

        const BATCH_SIZE: usize = 1000;

        let pool = self.pool.clone();
        let inserted = tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| PipelineError::DataUnavailable(e.to_string()))?;

            let inserted = conn
                .transaction::<usize, diesel::result::Error, _>(|conn| {
                    let replaced =
                        diesel::delete(flights_raw.filter(scrape_date.eq(date))).execute(conn)?;
                    if replaced > 0 {
                        info!("Replacing {} previously ingested rows for {}", replaced, date);
                    }

                    let mut inserted = 0;
                    for chunk in records.chunks(BATCH_SIZE) {
                        inserted += diesel::insert_into(flights_raw)
                            .values(chunk)
                            .execute(conn)?;
                    }
                    Ok(inserted)
                })
                .map_err(|e| PipelineError::Transaction(e.to_string()))?;

            Ok::<usize, anyhow::Error>(inserted)
        })
        .await??;

        info!("Committed {} flight records for {}", inserted, date);
        Ok(inserted)
    }

    /// All records observed on one scrape date, in schedule order.
    pub async fn get_for_date(&self, date: NaiveDate) -> Result<Vec<FlightRecord>> {
        use crate::schema::flights_raw::dsl::*;

        let pool = self.pool.clone();
        let records = tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| PipelineError::DataUnavailable(e.to_string()))?;
            let records: Vec<FlightRecord> = flights_raw
                .filter(scrape_date.eq(date))
                .order(scheduled_time.asc())
                .select(FlightRecord::as_select())
                .load(&mut conn)?;

            Ok::<Vec<FlightRecord>, anyhow::Error>(records)
        })
        .await??;

        Ok(records)
    }

    /// Records across an inclusive date range, newest first, optionally
    /// limited for display.
    pub async fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        limit: Option<i64>,
    ) -> Result<Vec<FlightRecord>> {
        use crate::schema::flights_raw::dsl::*;

        let pool = self.pool.clone();
        let records = tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| PipelineError::DataUnavailable(e.to_string()))?;

            let mut query = flights_raw
                .filter(scrape_date.ge(start))
                .filter(scrape_date.le(end))
                .order(scheduled_time.desc())
                .select(FlightRecord::as_select())
                .into_boxed();
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            let records: Vec<FlightRecord> = query.load(&mut conn)?;

            Ok::<Vec<FlightRecord>, anyhow::Error>(records)
        })
        .await??;

        Ok(records)
    }

    pub async fn count_for_date(&self, date: NaiveDate) -> Result<i64> {
        use crate::schema::flights_raw::dsl::*;

        let pool = self.pool.clone();
        let count = tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| PipelineError::DataUnavailable(e.to_string()))?;
            let count = flights_raw
                .filter(scrape_date.eq(date))
                .count()
                .get_result::<i64>(&mut conn)?;

            Ok::<i64, anyhow::Error>(count)
        })
        .await??;

        Ok(count)
    }
}
