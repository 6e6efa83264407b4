//! Batch driver: checks a list of usernames in fixed-size batches.
//!
//! Usernames are checked strictly one after another, in input order, with a
//! pause between consecutive checks. Progress is reported through a callback
//! so callers can print results as they arrive.

use crate::checker::UsernameChecker;
use crate::error::UsernameCheckError;
use crate::types::{BatchEvent, BatchSummary, RunSummary};
use crate::utils::read_usernames;
use std::path::Path;
use std::time::Duration;

/// Split usernames into consecutive batches of `batch_size`; the last batch
/// may be shorter. A `batch_size` of 0 is treated as 1.
pub fn partition(usernames: &[String], batch_size: usize) -> Vec<&[String]> {
    usernames.chunks(batch_size.max(1)).collect()
}

pub struct BatchRunner<'a> {
    checker: &'a UsernameChecker,
    batch_size: usize,
    delay: Duration,
}

impl<'a> BatchRunner<'a> {
    /// Use the checker's own batch size and delay.
    pub fn new(checker: &'a UsernameChecker) -> Self {
        let settings = checker.settings();
        Self {
            checker,
            batch_size: settings.batch_size,
            delay: settings.delay_duration(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Read a username list and check every entry.
    ///
    /// # Errors
    ///
    /// Returns `UsernameCheckError::FileError` if the list cannot be read;
    /// nothing is checked in that case. Ledger failures abort the run.
    pub async fn run_file<P, F>(
        &self,
        path: P,
        on_event: F,
    ) -> Result<RunSummary, UsernameCheckError>
    where
        P: AsRef<Path>,
        F: FnMut(BatchEvent),
    {
        let usernames = read_usernames(path)?;
        self.run(&usernames, on_event).await
    }

    /// Check every username, emitting progress events along the way.
    pub async fn run<F>(
        &self,
        usernames: &[String],
        mut on_event: F,
    ) -> Result<RunSummary, UsernameCheckError>
    where
        F: FnMut(BatchEvent),
    {
        self.checker.ledger().initialize()?;

        let batches = partition(usernames, self.batch_size);
        tracing::info!(
            usernames = usernames.len(),
            batches = batches.len(),
            batch_size = self.batch_size,
            "starting batch run"
        );

        let mut run = RunSummary::default();
        let mut checked = 0;

        for (index, batch) in batches.into_iter().enumerate() {
            let mut summary = BatchSummary::new(index + 1, batch.len());
            on_event(BatchEvent::BatchStarted {
                batch: summary.batch,
                size: summary.size,
            });

            for username in batch {
                if checked > 0 && !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }

                let result = self.checker.check_username(username).await?;
                checked += 1;
                summary.record(result.status);
                on_event(BatchEvent::Checked(result));
            }

            on_event(BatchEvent::BatchFinished(summary.clone()));
            run.batches.push(summary);
        }

        Ok(run)
    }
}
