pub mod flights;
pub mod stats;

pub use flights::*;
pub use stats::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataListResponse<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
