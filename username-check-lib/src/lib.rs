//! # Username Check Library
//!
//! Checks whether usernames are free on a web service by fetching each
//! profile page and looking for a "not claimed" marker in the response.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use username_check_lib::{BatchRunner, BatchEvent, ConfigStore, UsernameChecker};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ConfigStore::default().load()?;
//!     let checker = UsernameChecker::new(&settings)?;
//!
//!     let summary = BatchRunner::new(&checker)
//!         .run_file(&settings.input_file, |event| {
//!             if let BatchEvent::Checked(result) = event {
//!                 println!("{}: {}", result.username, result.status);
//!             }
//!         })
//!         .await?;
//!
//!     println!("{} available", summary.available());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Marker detection**: target URL and marker text come from the settings
//! - **Retries**: transport failures are retried with exponential backoff
//! - **CSV ledger**: one row per username, last result wins
//! - **Webhooks**: optional notification when a username is available
//! - **Error log**: every failed attempt is appended to a plain text log

// Re-export main public API types and functions
pub use batch::{partition, BatchRunner};
pub use checker::UsernameChecker;
pub use config::{ConfigStore, Settings, DEFAULT_CONFIG_FILE, USERNAME_PLACEHOLDER};
pub use error::UsernameCheckError;
pub use error_log::ErrorLog;
pub use ledger::{Ledger, LEDGER_HEADER};
pub use notifier::{availability_message, Notifier};
pub use retry::RetryPolicy;
pub use transport::{HttpResponse, HttpTransport, Transport};
pub use types::{
    Availability, BatchEvent, BatchSummary, CheckResult, LedgerRecord, NotifyOutcome, RunSummary,
};
pub use utils::{local_timestamp, read_usernames, TIMESTAMP_FORMAT};

// Internal modules - the re-exports above are the public API
mod batch;
mod checker;
mod config;
mod error;
mod error_log;
mod ledger;
mod notifier;
mod retry;
mod transport;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, UsernameCheckError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
