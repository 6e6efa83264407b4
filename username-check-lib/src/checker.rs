//! Username availability checker.
//!
//! Each check fetches the profile page for a username and looks for the
//! configured "not claimed" marker in the body:
//!
//! - marker present: [`Availability::Available`]
//! - any other answer: [`Availability::Unavailable`]
//! - no usable answer after every retry: [`Availability::Error`]
//!
//! Transport failures, timeouts, HTTP 429 and 5xx answers are retried with
//! exponential backoff. Every failed attempt goes to the error log. The final
//! status is written to the ledger, and available usernames are announced
//! through the notifier.

use crate::config::Settings;
use crate::error::UsernameCheckError;
use crate::error_log::ErrorLog;
use crate::ledger::Ledger;
use crate::notifier::Notifier;
use crate::retry::RetryPolicy;
use crate::transport::{HttpResponse, HttpTransport, Transport};
use crate::types::{Availability, CheckResult};
use std::sync::Arc;

/// Checks usernames one at a time and records the results.
///
/// # Example
///
/// ```rust,no_run
/// use username_check_lib::{Settings, UsernameChecker};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let checker = UsernameChecker::new(&Settings::default())?;
///     let result = checker.check_username("someone").await?;
///     println!("{}: {}", result.username, result.status);
///     Ok(())
/// }
/// ```
pub struct UsernameChecker {
    settings: Settings,
    retry: RetryPolicy,
    transport: Arc<dyn Transport>,
    ledger: Ledger,
    notifier: Notifier,
    error_log: ErrorLog,
}

impl UsernameChecker {
    /// Create a checker that talks to the network through reqwest.
    ///
    /// # Errors
    ///
    /// Returns `UsernameCheckError::ConfigError` if the settings fail
    /// [`Settings::validate`].
    pub fn new(settings: &Settings) -> Result<Self, UsernameCheckError> {
        settings.validate()?;
        let transport = HttpTransport::new(settings.request_timeout())?;
        Ok(Self::with_transport(settings, Arc::new(transport)))
    }

    /// Create a checker on top of a custom transport.
    pub fn with_transport(settings: &Settings, transport: Arc<dyn Transport>) -> Self {
        let error_log = ErrorLog::new(&settings.error_log_file);
        let notifier = Notifier::new(
            settings.webhook().map(str::to_string),
            Arc::clone(&transport),
            error_log.clone(),
        );

        Self {
            settings: settings.clone(),
            retry: RetryPolicy::new(settings.max_retries, settings.delay_duration()),
            transport,
            ledger: Ledger::new(&settings.output_file),
            notifier,
            error_log,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Check one username and persist the outcome.
    ///
    /// Network trouble never surfaces as an `Err`: it ends as
    /// `Availability::Error` in the returned result.
    ///
    /// # Errors
    ///
    /// Returns `UsernameCheckError` only if the ledger cannot be read or
    /// written.
    pub async fn check_username(&self, username: &str) -> Result<CheckResult, UsernameCheckError> {
        let url = self.settings.profile_url(username);
        let max_attempts = self.retry.max_attempts();
        let mut attempts = 0;
        let mut last_error = None;

        let status = loop {
            attempts += 1;
            tracing::debug!(username, %url, attempt = attempts, "requesting profile");

            let outcome = match self.transport.get(&url).await {
                Ok(response) => self.classify(&url, response),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(status) => break status,
                Err(e) => {
                    let message = format!(
                        "Failed to check '{}': {} (Attempt {}/{})",
                        username, e, attempts, max_attempts
                    );
                    tracing::warn!("{}", message);
                    self.error_log.record(&message);
                    last_error = Some(e.to_string());

                    if attempts >= max_attempts {
                        break Availability::Error;
                    }

                    tokio::time::sleep(self.retry.delay_for_retry(attempts)).await;
                }
            }
        };

        self.ledger.upsert(username, status)?;

        let notification = if status == Availability::Available {
            Some(self.notifier.notify_available(username).await)
        } else {
            None
        };

        Ok(CheckResult {
            username: username.to_string(),
            status,
            attempts,
            last_error: if status == Availability::Error {
                last_error
            } else {
                None
            },
            notification,
        })
    }

    /// Map a response to a status, or to a retryable error for 429/5xx
    /// answers that don't carry the marker.
    fn classify(
        &self,
        url: &str,
        response: HttpResponse,
    ) -> Result<Availability, UsernameCheckError> {
        if response.body.contains(&self.settings.available_marker) {
            return Ok(Availability::Available);
        }

        let error = UsernameCheckError::http_status(url, response.status);
        if error.is_retryable() {
            Err(error)
        } else {
            Ok(Availability::Unavailable)
        }
    }
}
