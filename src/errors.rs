use thiserror::Error;

/// Whole-run failures. These abort the batch with no partial effect and
/// surface to the external scheduler through the process exit status.
/// Retry policy lives with the scheduler, not here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The store could not be reached, or expected upstream data is missing.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// A batch transaction failed to commit.
    #[error("transaction failed: {0}")]
    Transaction(String),
}

/// Why a single scraped entry was rejected. Per-record failures never abort
/// the run; they are accumulated and reported in the batch summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    MissingFlightNumber,
    MissingScheduledTime,
    /// No configured time format matched the raw schedule string.
    UnparseableTime(String),
    /// The parsed schedule falls on a different calendar day than the
    /// scrape date, so the entry does not belong to this batch.
    WrongDay(String),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::MissingFlightNumber => write!(f, "missing flight number"),
            RejectReason::MissingScheduledTime => write!(f, "missing scheduled time"),
            RejectReason::UnparseableTime(raw) => {
                write!(f, "unparseable scheduled time '{raw}'")
            }
            RejectReason::WrongDay(raw) => {
                write!(f, "scheduled time '{raw}' is outside the scrape date")
            }
        }
    }
}
