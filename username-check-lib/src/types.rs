//! Core data types for username availability checking.
//!
//! This module defines the outcome of a check, the rows persisted to the
//! ledger, and the summaries produced by batch runs.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::UsernameCheckError;

/// Terminal outcome of a single username check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// The service reported the username as unclaimed
    Available,

    /// The service answered and the username is taken
    Unavailable,

    /// Every attempt failed at the transport level
    Error,
}

impl Availability {
    /// Lowercase form used in the ledger file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Unavailable => "unavailable",
            Availability::Error => "error",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = UsernameCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(Availability::Available),
            "unavailable" => Ok(Availability::Unavailable),
            "error" => Ok(Availability::Error),
            other => Err(UsernameCheckError::ParseError {
                message: format!("unknown status '{}'", other),
                line: None,
            }),
        }
    }
}

/// One row of the results ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    /// The username, unique within the ledger
    pub username: String,

    /// Last known availability
    pub status: Availability,

    /// Local time of the check, formatted `%Y-%m-%d %H:%M:%S`
    pub timestamp: String,
}

/// Result of delivering a webhook notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// No webhook URL configured
    Skipped,

    /// The endpoint acknowledged with HTTP 204
    Sent,

    /// Delivery failed; the reason has been written to the error log
    Failed { reason: String },
}

/// Full result of checking one username.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// The username that was checked
    pub username: String,

    /// Classification of the response
    pub status: Availability,

    /// Number of requests issued, including the first
    pub attempts: u32,

    /// Last transport error, if any attempt failed
    pub last_error: Option<String>,

    /// Outcome of the webhook call, only present for available usernames
    pub notification: Option<NotifyOutcome>,
}

/// Per-batch outcome counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// 1-based batch number
    pub batch: usize,

    /// Number of usernames in this batch
    pub size: usize,

    pub available: usize,
    pub unavailable: usize,
    pub errors: usize,
}

impl BatchSummary {
    /// Start an empty summary for the given batch.
    pub fn new(batch: usize, size: usize) -> Self {
        Self {
            batch,
            size,
            ..Default::default()
        }
    }

    /// Count one outcome.
    pub fn record(&mut self, status: Availability) {
        match status {
            Availability::Available => self.available += 1,
            Availability::Unavailable => self.unavailable += 1,
            Availability::Error => self.errors += 1,
        }
    }
}

/// Aggregate of a whole batch run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub batches: Vec<BatchSummary>,
}

impl RunSummary {
    /// Total number of usernames checked.
    pub fn total(&self) -> usize {
        self.batches.iter().map(|b| b.size).sum()
    }

    pub fn available(&self) -> usize {
        self.batches.iter().map(|b| b.available).sum()
    }

    pub fn unavailable(&self) -> usize {
        self.batches.iter().map(|b| b.unavailable).sum()
    }

    pub fn errors(&self) -> usize {
        self.batches.iter().map(|b| b.errors).sum()
    }
}

/// Progress events emitted while a batch run is in flight.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// A batch is about to start
    BatchStarted { batch: usize, size: usize },

    /// One username finished checking
    Checked(CheckResult),

    /// All usernames of a batch have been checked
    BatchFinished(BatchSummary),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_parse_is_case_insensitive() {
        assert_eq!(
            "Available".parse::<Availability>().unwrap(),
            Availability::Available
        );
        assert_eq!(
            " unavailable ".parse::<Availability>().unwrap(),
            Availability::Unavailable
        );
        assert_eq!("ERROR".parse::<Availability>().unwrap(), Availability::Error);
        assert!("maybe".parse::<Availability>().is_err());
    }

    #[test]
    fn test_batch_summary_counts_by_outcome() {
        let mut summary = BatchSummary::new(1, 4);
        summary.record(Availability::Available);
        summary.record(Availability::Unavailable);
        summary.record(Availability::Error);
        summary.record(Availability::Error);

        assert_eq!(summary.available, 1);
        assert_eq!(summary.unavailable, 1);
        assert_eq!(summary.errors, 2);
    }

    #[test]
    fn test_run_summary_totals() {
        let mut first = BatchSummary::new(1, 2);
        first.record(Availability::Available);
        first.record(Availability::Unavailable);
        let mut second = BatchSummary::new(2, 1);
        second.record(Availability::Error);

        let run = RunSummary {
            batches: vec![first, second],
        };
        assert_eq!(run.total(), 3);
        assert_eq!(run.available(), 1);
        assert_eq!(run.unavailable(), 1);
        assert_eq!(run.errors(), 1);
    }
}
