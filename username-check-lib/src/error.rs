//! Error handling for username checking operations.
//!
//! This module defines a single error type that covers the ways a check run
//! can fail, from transport problems to malformed settings or ledger files.

use std::fmt;
use std::time::Duration;

/// Main error type for username checking operations.
#[derive(Debug, Clone)]
pub enum UsernameCheckError {
    /// Network-related errors (connection refused, DNS, TLS, etc.)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// The request did not complete within the configured timeout
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// The server answered with a status code we cannot classify
    HttpStatus { url: String, status_code: u16 },

    /// Configuration errors (malformed or invalid settings file)
    ConfigError { message: String },

    /// File I/O errors on the username list, ledger or error log
    FileError { path: String, message: String },

    /// Ledger rows that cannot be parsed
    ParseError {
        message: String,
        line: Option<usize>,
    },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl UsernameCheckError {
    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new HTTP status error.
    pub fn http_status<U: Into<String>>(url: U, status_code: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status_code,
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error pointing at a line of the input.
    pub fn parse_at<M: Into<String>>(message: M, line: usize) -> Self {
        Self::ParseError {
            message: message.into(),
            line: Some(line),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error suggests the request should be retried.
    ///
    /// Transport failures, timeouts, rate limiting and server-side errors are
    /// transient. Everything else is a problem on our side.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. }
                | Self::Timeout { .. }
                | Self::HttpStatus {
                    status_code: 429 | 500..=599,
                    ..
                }
        )
    }
}

impl fmt::Display for UsernameCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::HttpStatus { url, status_code } => {
                write!(f, "HTTP {} from {}", status_code, url)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::ParseError { message, line } => {
                if let Some(line) = line {
                    write!(f, "Parse error on line {}: {}", line, message)
                } else {
                    write!(f, "Parse error: {}", message)
                }
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for UsernameCheckError {}

impl From<reqwest::Error> for UsernameCheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest doesn't report the configured limit, callers that know it
            // build the Timeout variant themselves
            Self::timeout("HTTP request", Duration::from_secs(0))
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<std::io::Error> for UsernameCheckError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<toml::de::Error> for UsernameCheckError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML configuration: {}", err))
    }
}

impl From<toml::ser::Error> for UsernameCheckError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("Failed to serialize configuration: {}", err))
    }
}

impl From<serde_json::Error> for UsernameCheckError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON serialization failed: {}", err),
            line: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors_are_retryable() {
        assert!(UsernameCheckError::network("connection reset").is_retryable());
        assert!(UsernameCheckError::timeout("GET", Duration::from_secs(5)).is_retryable());
        assert!(UsernameCheckError::http_status("https://x/a", 503).is_retryable());
        assert!(UsernameCheckError::http_status("https://x/a", 429).is_retryable());
    }

    #[test]
    fn test_local_errors_are_not_retryable() {
        assert!(!UsernameCheckError::http_status("https://x/a", 404).is_retryable());
        assert!(!UsernameCheckError::config("bad").is_retryable());
        assert!(!UsernameCheckError::file_error("a.txt", "missing").is_retryable());
        assert!(!UsernameCheckError::parse_at("bad row", 3).is_retryable());
    }

    #[test]
    fn test_display_messages() {
        let err = UsernameCheckError::file_error("usernames.txt", "not found");
        assert_eq!(err.to_string(), "File error at 'usernames.txt': not found");

        let err = UsernameCheckError::parse_at("unknown status 'maybe'", 4);
        assert_eq!(
            err.to_string(),
            "Parse error on line 4: unknown status 'maybe'"
        );

        let err = UsernameCheckError::network_with_source("Connection failed", "refused");
        assert_eq!(
            err.to_string(),
            "Network error: Connection failed (source: refused)"
        );
    }
}
