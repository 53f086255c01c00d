use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::actions::json_error;
use crate::stats::{DailyStat, StatKind};
use crate::stats_repo::StatsRepository;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub date: Option<NaiveDate>,
    pub kind: StatKind,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stat_date: NaiveDate,
    pub kind: StatKind,
    /// False when the aggregator has not run for this date yet; the
    /// dashboard shows a "not yet computed" state, not an error or a
    /// zero-filled chart.
    pub computed: bool,
    pub data: Vec<DailyStat>,
}

/// GET /data/stats
/// Aggregated rows for one `(date, kind)`. The date defaults to today,
/// which is routinely queried before the day's aggregation has run - that
/// returns an empty, `computed: false` response rather than an error.
pub async fn get_stats(
    Query(params): Query<StatsParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let stat_date = params
        .date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let repo = StatsRepository::new(state.pool.clone());
    match repo.get_for_date_kind(stat_date, params.kind).await {
        Ok(data) => {
            let response = StatsResponse {
                stat_date,
                kind: params.kind,
                computed: !data.is_empty(),
                data,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to fetch stats: {}", e);
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to fetch stats: {}", e),
            )
            .into_response()
        }
    }
}

/// GET /data/metrics
/// Whole-store headline numbers for the dashboard header.
pub async fn get_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let repo = StatsRepository::new(state.pool.clone());
    match repo.get_board_metrics().await {
        Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        Err(e) => {
            error!("Failed to fetch board metrics: {}", e);
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to fetch board metrics: {}", e),
            )
            .into_response()
        }
    }
}
