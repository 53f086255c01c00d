use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::error;

use crate::actions::{DataListResponse, json_error};
use crate::flights_repo::FlightsRepository;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct FlightsParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<i64>,
}

/// GET /data/flights
/// Raw departure records over a date range, newest first. The range
/// defaults to the last 7 days.
pub async fn get_flights(
    Query(params): Query<FlightsParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let end_date = params
        .end_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let start_date = params
        .start_date
        .unwrap_or_else(|| end_date - chrono::Duration::days(7));

    if start_date > end_date {
        return json_error(StatusCode::BAD_REQUEST, "start_date is after end_date")
            .into_response();
    }

    let repo = FlightsRepository::new(state.pool.clone());
    match repo
        .get_by_date_range(start_date, end_date, params.limit.or(Some(1000)))
        .await
    {
        Ok(data) => (StatusCode::OK, Json(DataListResponse { data })).into_response(),
        Err(e) => {
            error!("Failed to fetch flights: {}", e);
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to fetch flights: {}", e),
            )
            .into_response()
        }
    }
}
