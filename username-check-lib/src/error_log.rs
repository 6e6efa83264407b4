//! Append-only error log.
//!
//! Transport failures and webhook problems never reach the console; they are
//! written here, one line each, prefixed with a bracketed local timestamp.

use crate::utils::local_timestamp;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line. Failing to write the log is reported through
    /// `tracing` only; it never interrupts a check.
    pub fn record(&self, message: &str) {
        let line = format!("[{}] {}\n", local_timestamp(), message);

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "could not write error log");
        }
    }
}
