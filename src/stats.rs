use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

/// The three aggregation dimensions computed per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DbEnum)]
#[db_enum(existing_type_path = "crate::schema::sql_types::StatKind")]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    TopDestination,
    TopAirline,
    HourlyBucket,
}

impl StatKind {
    pub const ALL: [StatKind; 3] = [
        StatKind::TopDestination,
        StatKind::TopAirline,
        StatKind::HourlyBucket,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::TopDestination => "top_destination",
            StatKind::TopAirline => "top_airline",
            StatKind::HourlyBucket => "hourly_bucket",
        }
    }
}

impl std::str::FromStr for StatKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top_destination" => Ok(StatKind::TopDestination),
            "top_airline" => Ok(StatKind::TopAirline),
            "hourly_bucket" => Ok(StatKind::HourlyBucket),
            other => Err(anyhow::anyhow!("unknown stat kind '{other}'")),
        }
    }
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One computed metric value for one statistic kind on one date.
///
/// For a given `(stat_date, kind)` the stored key set is exhaustive over the
/// day's flight records: every record maps to exactly one key per kind, so
/// the values sum to the day's record count.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::daily_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DailyStat {
    pub id: i32,
    pub stat_date: NaiveDate,
    pub kind: StatKind,

    /// Destination code, airline name, or hour of day ("0".."23").
    pub key: String,

    pub value: i64,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::daily_stats)]
pub struct NewDailyStat {
    pub stat_date: NaiveDate,
    pub kind: StatKind,
    pub key: String,
    pub value: i64,
}

/// Whole-store headline numbers for the dashboard header.
#[derive(Debug, Clone, Serialize)]
pub struct BoardMetrics {
    pub total_flights: i64,
    pub distinct_destinations: i64,
    pub distinct_airlines: i64,
    pub first_scheduled: Option<NaiveDateTime>,
    pub last_scheduled: Option<NaiveDateTime>,
}
