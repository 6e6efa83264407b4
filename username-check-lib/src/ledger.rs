//! CSV results ledger.
//!
//! The ledger maps each username to its last known status and check time.
//! It is small and rewritten in full on every update: the whole file is
//! read, the record replaced or appended, and the file written back with
//! its header. Row order follows first insertion.

use crate::error::UsernameCheckError;
use crate::types::{Availability, LedgerRecord};
use crate::utils::local_timestamp;
use std::fs;
use std::path::{Path, PathBuf};

/// Column names, in the order they are written.
pub const LEDGER_HEADER: [&str; 3] = ["Username", "Status", "Timestamp"];

/// Handle to a ledger file on disk.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header if the file is missing or empty. No-op otherwise.
    pub fn initialize(&self) -> Result<(), UsernameCheckError> {
        let is_empty = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(self.file_error("stat", e)),
        };

        if is_empty {
            fs::write(&self.path, encode_row(&LEDGER_HEADER))
                .map_err(|e| self.file_error("initialize", e))?;
        }
        Ok(())
    }

    /// Read every record, in file order. A missing file yields no records.
    pub fn load_all(&self) -> Result<Vec<LedgerRecord>, UsernameCheckError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.file_error("read", e)),
        };

        parse_ledger(&content)
    }

    /// Insert or replace the record for `username` and rewrite the file.
    ///
    /// Returns the record as written.
    pub fn upsert(
        &self,
        username: &str,
        status: Availability,
    ) -> Result<LedgerRecord, UsernameCheckError> {
        let mut records = self.load_all()?;
        let record = LedgerRecord {
            username: username.to_string(),
            status,
            timestamp: local_timestamp(),
        };

        match records.iter_mut().find(|r| r.username == username) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }

        self.write_all(&records)?;
        tracing::debug!(username, %status, "ledger updated");
        Ok(record)
    }

    fn write_all(&self, records: &[LedgerRecord]) -> Result<(), UsernameCheckError> {
        let mut out = encode_row(&LEDGER_HEADER);
        for record in records {
            out.push_str(&encode_row(&[
                record.username.as_str(),
                record.status.as_str(),
                record.timestamp.as_str(),
            ]));
        }

        fs::write(&self.path, out).map_err(|e| self.file_error("write", e))
    }

    fn file_error(&self, action: &str, err: std::io::Error) -> UsernameCheckError {
        UsernameCheckError::file_error(
            self.path.to_string_lossy(),
            format!("Failed to {} ledger: {}", action, err),
        )
    }
}

/// Parse ledger content. Columns are located by header name.
fn parse_ledger(content: &str) -> Result<Vec<LedgerRecord>, UsernameCheckError> {
    let mut rows = parse_csv(content)?.into_iter();

    let (_, header) = match rows.next() {
        Some(row) => row,
        None => return Ok(Vec::new()),
    };

    let column = |name: &str| {
        header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| UsernameCheckError::parse_at(format!("missing '{}' column", name), 1))
    };
    let username_col = column(LEDGER_HEADER[0])?;
    let status_col = column(LEDGER_HEADER[1])?;
    let timestamp_col = column(LEDGER_HEADER[2])?;

    let mut records: Vec<LedgerRecord> = Vec::new();
    for (line, row) in rows {
        if row.len() != header.len() {
            return Err(UsernameCheckError::parse_at(
                format!("expected {} fields, found {}", header.len(), row.len()),
                line,
            ));
        }

        let status = row[status_col]
            .parse::<Availability>()
            .map_err(|e| match e {
                UsernameCheckError::ParseError { message, .. } => {
                    UsernameCheckError::parse_at(message, line)
                }
                other => other,
            })?;

        let record = LedgerRecord {
            username: row[username_col].clone(),
            status,
            timestamp: row[timestamp_col].clone(),
        };

        // Files edited by hand may repeat a username; the later row wins
        match records.iter_mut().find(|r| r.username == record.username) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    Ok(records)
}

/// Quote a field if it contains a delimiter, quote or line break.
fn encode_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn encode_row(fields: &[&str]) -> String {
    let mut row = fields
        .iter()
        .map(|f| encode_field(f))
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

/// Split CSV text into rows of fields, tagged with the 1-based line each row
/// starts on. Blank lines are skipped. Accepts `\n` and `\r\n` endings.
fn parse_csv(content: &str) -> Result<Vec<(usize, Vec<String>)>, UsernameCheckError> {
    let mut rows = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut row_start = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                if !(fields.len() == 1 && fields[0].is_empty()) {
                    rows.push((row_start, std::mem::take(&mut fields)));
                }
                fields.clear();
                line += 1;
                row_start = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(UsernameCheckError::parse_at("unterminated quoted field", row_start));
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        rows.push((row_start, fields));
    }

    Ok(rows)
}
