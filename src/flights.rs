use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

/// Departure status as shown on the board on the scrape date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum)]
#[db_enum(existing_type_path = "crate::schema::sql_types::FlightStatus")]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    OnTime,
    Delayed,
    Cancelled,
    Unknown,
}

impl FlightStatus {
    /// Canonical token used in config alias tables and API output.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::OnTime => "on_time",
            FlightStatus::Delayed => "delayed",
            FlightStatus::Cancelled => "cancelled",
            FlightStatus::Unknown => "unknown",
        }
    }
}

impl From<&str> for FlightStatus {
    fn from(token: &str) -> Self {
        match token {
            "on_time" => FlightStatus::OnTime,
            "delayed" => FlightStatus::Delayed,
            "cancelled" => FlightStatus::Cancelled,
            _ => FlightStatus::Unknown,
        }
    }
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scheduled departure observed on a scrape date.
///
/// Rows are immutable once committed. `(flight_number, scheduled_time,
/// scrape_date)` is the natural key; re-ingesting a date replaces the whole
/// day's rows rather than updating any of them in place.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::flights_raw)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FlightRecord {
    pub id: i32,

    /// Source board identifier, e.g. "chopin".
    pub airport: String,

    pub flight_number: String,
    pub airline: String,

    /// Destination city or airport code, canonicalized by the normalizer.
    pub destination: String,

    /// Scheduled departure in airport wall time. The board publishes local
    /// time and the hourly statistics are defined over it, so no timezone
    /// conversion happens anywhere in the pipeline.
    pub scheduled_time: NaiveDateTime,

    /// Calendar date the data was collected for. Distinct from the wall
    /// clock time the collector ran.
    pub scrape_date: NaiveDate,

    pub status: FlightStatus,
    pub created_at: DateTime<Utc>,
}

/// Insertable form of [`FlightRecord`]; `id` and `created_at` come from the
/// database.
#[derive(Debug, Clone, PartialEq, Eq, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::flights_raw)]
pub struct NewFlightRecord {
    pub airport: String,
    pub flight_number: String,
    pub airline: String,
    pub destination: String,
    pub scheduled_time: NaiveDateTime,
    pub scrape_date: NaiveDate,
    pub status: FlightStatus,
}

impl NewFlightRecord {
    /// The in-batch slice of the natural key; `scrape_date` is fixed for a
    /// whole batch, so two entries collide exactly when these match.
    pub fn dedup_key(&self) -> (String, NaiveDateTime) {
        (self.flight_number.clone(), self.scheduled_time)
    }
}
