//! Settings file loading and persistence.
//!
//! The settings live in a small TOML document next to the working directory.
//! On first run the file does not exist yet, so defaults are written out for
//! the user to edit.

use crate::error::UsernameCheckError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default settings file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "username-check.toml";

/// Placeholder substituted with the username in `target_url`.
pub const USERNAME_PLACEHOLDER: &str = "{username}";

/// Runtime settings for a checking session.
///
/// Missing keys fall back to their defaults, so settings files written by an
/// older version keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds to wait between checks, and the base of the retry backoff
    pub delay: f64,

    /// Retries after the first failed attempt
    pub max_retries: u32,

    /// Username list, one per line
    pub input_file: PathBuf,

    /// Results ledger (CSV)
    pub output_file: PathBuf,

    /// Kept for compatibility with existing settings files; not used
    pub append_csv: bool,

    /// Usernames per batch
    pub batch_size: usize,

    /// Webhook notified for available usernames; empty disables it
    pub webhook_url: String,

    /// Append-only log of transport and webhook failures
    pub error_log_file: PathBuf,

    /// Profile URL template, must contain `{username}`
    pub target_url: String,

    /// Text whose presence in the response marks a username as available
    pub available_marker: String,

    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delay: 1.0,
            max_retries: 3,
            input_file: PathBuf::from("usernames.txt"),
            output_file: PathBuf::from("results.csv"),
            append_csv: false,
            batch_size: 100,
            webhook_url: String::new(),
            error_log_file: PathBuf::from("error_log.txt"),
            target_url: format!("https://guns.lol/{}", USERNAME_PLACEHOLDER),
            available_marker: "This user is not claimed".to_string(),
            request_timeout_secs: 5,
        }
    }
}

impl Settings {
    /// Delay between checks as a `Duration`.
    ///
    /// Negative or NaN delays read as zero and delays too large for a
    /// `Duration` saturate. [`Settings::validate`] rejects both.
    pub fn delay_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Per-request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the profile URL for a username.
    pub fn profile_url(&self, username: &str) -> String {
        self.target_url.replace(USERNAME_PLACEHOLDER, username)
    }

    /// Configured webhook, or `None` when notifications are disabled.
    pub fn webhook(&self) -> Option<&str> {
        let url = self.webhook_url.trim();
        if url.is_empty() {
            None
        } else {
            Some(url)
        }
    }

    /// Reject values the checker cannot work with.
    pub fn validate(&self) -> Result<(), UsernameCheckError> {
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(UsernameCheckError::config(format!(
                "delay must be a non-negative number of seconds, got {}",
                self.delay
            )));
        }

        if Duration::try_from_secs_f64(self.delay).is_err() {
            return Err(UsernameCheckError::config(format!(
                "delay of {} seconds is too large",
                self.delay
            )));
        }

        if self.batch_size == 0 {
            return Err(UsernameCheckError::config("batch_size must be at least 1"));
        }

        if self.request_timeout_secs == 0 {
            return Err(UsernameCheckError::config(
                "request_timeout_secs must be at least 1",
            ));
        }

        if !self.target_url.contains(USERNAME_PLACEHOLDER) {
            return Err(UsernameCheckError::config(format!(
                "target_url '{}' must contain {}",
                self.target_url, USERNAME_PLACEHOLDER
            )));
        }

        if self.available_marker.is_empty() {
            return Err(UsernameCheckError::config(
                "available_marker cannot be empty",
            ));
        }

        Ok(())
    }
}

/// Loads and saves [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store for the given settings file.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, writing defaults first if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `UsernameCheckError::ConfigError` if the file is malformed or
    /// holds invalid values, and `FileError` if it cannot be read or created.
    pub fn load(&self) -> Result<Settings, UsernameCheckError> {
        if !self.path.exists() {
            let settings = Settings::default();
            self.save(&settings)?;
            tracing::info!(path = %self.path.display(), "wrote default settings");
            return Ok(settings);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            UsernameCheckError::file_error(
                self.path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;

        tracing::debug!(path = %self.path.display(), "loaded settings");
        Ok(settings)
    }

    /// Write settings to disk, replacing any existing file.
    pub fn save(&self, settings: &Settings) -> Result<(), UsernameCheckError> {
        let content = toml::to_string_pretty(settings)?;

        fs::write(&self.path, content).map_err(|e| {
            UsernameCheckError::file_error(
                self.path.to_string_lossy(),
                format!("Failed to write configuration file: {}", e),
            )
        })
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        let store = ConfigStore::new(&path);

        let settings = store.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());

        // Second load reads the file that was just written
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            r#"
delay = 2
max_retries = 5
input_file = "names.txt"
output_file = "out.csv"
append_csv = true
batch_size = 10
webhook_url = "https://hooks.example.com/abc"
"#,
        )
        .unwrap();

        let settings = ConfigStore::new(&path).load().unwrap();
        assert_eq!(settings.delay, 2.0);
        assert_eq!(settings.max_retries, 5);
        assert_eq!(settings.input_file, PathBuf::from("names.txt"));
        assert_eq!(settings.output_file, PathBuf::from("out.csv"));
        assert!(settings.append_csv);
        assert_eq!(settings.batch_size, 10);
        assert_eq!(settings.webhook(), Some("https://hooks.example.com/abc"));
        // Keys absent from the file keep their defaults
        assert_eq!(settings.request_timeout_secs, 5);
        assert_eq!(settings.available_marker, "This user is not claimed");
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "delay = [oops").unwrap();

        let result = ConfigStore::new(&path).load();
        assert!(matches!(
            result,
            Err(UsernameCheckError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");

        fs::write(&path, "batch_size = 0").unwrap();
        assert!(ConfigStore::new(&path).load().is_err());

        fs::write(&path, "delay = -1.5").unwrap();
        assert!(ConfigStore::new(&path).load().is_err());

        fs::write(&path, "target_url = \"https://example.com/\"").unwrap();
        assert!(ConfigStore::new(&path).load().is_err());
    }

    #[test]
    fn test_huge_delay_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "delay = 1e20").unwrap();

        match ConfigStore::new(&path).load() {
            Err(UsernameCheckError::ConfigError { message }) => {
                assert!(message.contains("too large"), "unexpected message: {message}")
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_delay_duration_never_panics() {
        let huge = Settings {
            delay: 1e20,
            ..Settings::default()
        };
        assert_eq!(huge.delay_duration(), Duration::MAX);

        let negative = Settings {
            delay: -1.0,
            ..Settings::default()
        };
        assert_eq!(negative.delay_duration(), Duration::ZERO);

        let nan = Settings {
            delay: f64::NAN,
            ..Settings::default()
        };
        assert_eq!(nan.delay_duration(), Duration::ZERO);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("settings.toml"));
        store.load().unwrap();

        let settings = Settings {
            delay: 0.5,
            webhook_url: "https://hooks.example.com/x".to_string(),
            ..Settings::default()
        };
        store.save(&settings).unwrap();

        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_profile_url_and_webhook_helpers() {
        let settings = Settings {
            target_url: "https://profiles.example/u/{username}?tab=main".to_string(),
            webhook_url: "   ".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            settings.profile_url("alice"),
            "https://profiles.example/u/alice?tab=main"
        );
        assert_eq!(settings.webhook(), None);
        assert_eq!(settings.delay_duration(), Duration::from_secs(1));
    }
}
