//! Utility functions shared across the library.

use crate::error::UsernameCheckError;
use std::fs;
use std::path::Path;

/// Timestamp format used by the ledger and the error log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time with second precision.
pub fn local_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Read usernames from a file, one per line.
///
/// Lines are trimmed and blank lines ignored. Every other line is a username,
/// including ones that start with '#'.
/// Input order is preserved and duplicates are kept.
///
/// # Errors
///
/// Returns `UsernameCheckError::FileError` if the file cannot be read.
pub fn read_usernames<P: AsRef<Path>>(path: P) -> Result<Vec<String>, UsernameCheckError> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        let message = if e.kind() == std::io::ErrorKind::NotFound {
            "File not found".to_string()
        } else {
            format!("Failed to read username list: {}", e)
        };
        UsernameCheckError::file_error(path.to_string_lossy(), message)
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_usernames_skips_blanks_only() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "alice\n\n#tag\n  bob  \r\n   \ncarol\n").unwrap();

        let names = read_usernames(file.path()).unwrap();
        assert_eq!(names, vec!["alice", "#tag", "bob", "carol"]);
    }

    #[test]
    fn test_read_usernames_missing_file() {
        let err = read_usernames("/definitely/not/here.txt").unwrap_err();
        match err {
            UsernameCheckError::FileError { path, message } => {
                assert_eq!(path, "/definitely/not/here.txt");
                assert_eq!(message, "File not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_local_timestamp_shape() {
        let ts = local_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }
}
