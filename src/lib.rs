//! flightboard - daily batch ETL for airport departure boards.
//!
//! A collector scrapes the departures page and drops a batch file; the
//! normalizer turns it into canonical flight records in Postgres, the
//! aggregator recomputes per-day statistics, and a read-only query layer
//! serves both to the dashboard.

pub mod actions;
pub mod aggregator;
pub mod config;
pub mod errors;
pub mod flights;
pub mod flights_repo;
pub mod normalizer;
pub mod schema;
pub mod scrape;
pub mod stats;
pub mod stats_repo;
pub mod web;

pub use config::PipelineConfig;
pub use errors::{PipelineError, RejectReason};
pub use flights::{FlightRecord, FlightStatus, NewFlightRecord};
pub use scrape::ScrapedEntry;
pub use stats::{DailyStat, NewDailyStat, StatKind};
