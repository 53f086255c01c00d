use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use tracing::info;

use crate::errors::PipelineError;
use crate::stats::{BoardMetrics, DailyStat, NewDailyStat, StatKind};
use crate::web::PgPool;

/// Sole writer of the stats store; the query layer reads through it.
#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace every statistic row for one date with a freshly computed set.
    ///
    /// Delete-then-insert inside one transaction, so old and new stats never
    /// coexist and recomputation is idempotent. An empty set still clears
    /// the date, which keeps stats in step with a day whose raw data was
    /// replaced by nothing.
    pub async fn replace_for_date(
        &self,
        date: NaiveDate,
        stats: Vec<NewDailyStat>,
    ) -> Result<usize> {
        use crate::schema::daily_stats::dsl::*;

        const BATCH_SIZE: usize = 1000;

        let pool = self.pool.clone();
        let inserted = tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| PipelineError::DataUnavailable(e.to_string()))?;

            let inserted = conn
                .transaction::<usize, diesel::result::Error, _>(|conn| {
                    diesel::delete(daily_stats.filter(stat_date.eq(date))).execute(conn)?;

                    let mut inserted = 0;
                    for chunk in stats.chunks(BATCH_SIZE) {
                        inserted += diesel::insert_into(daily_stats)
                            .values(chunk)
                            .execute(conn)?;
                    }
                    Ok(inserted)
                })
                .map_err(|e| PipelineError::Transaction(e.to_string()))?;

            Ok::<usize, anyhow::Error>(inserted)
        })
        .await??;

        info!("Stored {} stat rows for {}", inserted, date);
        Ok(inserted)
    }

    /// Stored rows for one `(stat_date, kind)`. Empty when the aggregator
    /// has not run for that date - callers treat that as "not yet
    /// computed", never as an error.
    pub async fn get_for_date_kind(
        &self,
        date: NaiveDate,
        stat_kind: StatKind,
    ) -> Result<Vec<DailyStat>> {
        use crate::schema::daily_stats::dsl::*;

        let pool = self.pool.clone();
        let mut rows = tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| PipelineError::DataUnavailable(e.to_string()))?;
            let rows: Vec<DailyStat> = daily_stats
                .filter(stat_date.eq(date))
                .filter(kind.eq(stat_kind))
                .order((value.desc(), key.asc()))
                .select(DailyStat::as_select())
                .load(&mut conn)?;

            Ok::<Vec<DailyStat>, anyhow::Error>(rows)
        })
        .await??;

        // Hour keys are numeric strings; histogram order beats count order.
        if stat_kind == StatKind::HourlyBucket {
            rows.sort_by_key(|row| row.key.parse::<u8>().unwrap_or(u8::MAX));
        }

        Ok(rows)
    }

    /// Whole-store headline numbers for the dashboard header.
    pub async fn get_board_metrics(&self) -> Result<BoardMetrics> {
        let pool = self.pool.clone();
        let metrics = tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| PipelineError::DataUnavailable(e.to_string()))?;

            #[derive(QueryableByName)]
            struct Row {
                #[diesel(sql_type = diesel::sql_types::BigInt)]
                total_flights: i64,
                #[diesel(sql_type = diesel::sql_types::BigInt)]
                distinct_destinations: i64,
                #[diesel(sql_type = diesel::sql_types::BigInt)]
                distinct_airlines: i64,
                #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Timestamp>)]
                first_scheduled: Option<NaiveDateTime>,
                #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Timestamp>)]
                last_scheduled: Option<NaiveDateTime>,
            }

            let row: Row = diesel::sql_query(
                r#"
                SELECT
                    COUNT(*)::bigint AS total_flights,
                    COUNT(DISTINCT destination)::bigint AS distinct_destinations,
                    COUNT(DISTINCT airline)::bigint AS distinct_airlines,
                    MIN(scheduled_time) AS first_scheduled,
                    MAX(scheduled_time) AS last_scheduled
                FROM flights_raw
                "#,
            )
            .get_result(&mut conn)?;

            Ok::<BoardMetrics, anyhow::Error>(BoardMetrics {
                total_flights: row.total_flights,
                distinct_destinations: row.distinct_destinations,
                distinct_airlines: row.distinct_airlines,
                first_scheduled: row.first_scheduled,
                last_scheduled: row.last_scheduled,
            })
        })
        .await??;

        Ok(metrics)
    }
}
