// src/proc/parse.rs

//! Raw process-table line parsing.
//!
//! Each raw line carries `pid`, a calendar start timestamp (`lstart`-style,
//! e.g. `Tue Feb 16 15:16:06 2021`), and the full command line:
//!
//! ```text
//!  3061 Tue Feb 16 15:16:06 2021 /bin/ls
//! 19191 Tue Feb 16 15:00:05 2021 /usr/bin/python3
//! ```
//!
//! Parsing is tokenized — split on runs of whitespace, first token is the
//! pid, the next [`TIMESTAMP_TOKENS`] tokens are the timestamp, the
//! remainder joined is the command text. This is robust to column-width
//! drift, unlike slicing by byte offset.

use chrono::{DateTime, Local, NaiveDateTime};
use thiserror::Error;
use tracing::warn;

use crate::types::{ProcessRecord, Snapshot};

/// Number of whitespace-delimited tokens making up the start timestamp
/// (`Tue Feb 16 15:16:06 2021`).
pub const TIMESTAMP_TOKENS: usize = 5;

/// `strftime` format matching the `lstart` timestamp tokens.
///
/// The raw field carries no timezone; it is interpreted as local time.
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseLineError {
    #[error("empty line")]
    Empty,

    #[error("expected pid, timestamp, and command fields")]
    MissingFields,

    #[error("invalid pid '{0}'")]
    BadPid(String),

    #[error("invalid start timestamp '{0}'")]
    BadTimestamp(String),
}

/// Parse one raw process-table line into a [`ProcessRecord`].
pub fn parse_line(line: &str) -> Result<ProcessRecord, ParseLineError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ParseLineError::Empty);
    }

    let mut tokens = trimmed.split_whitespace();

    let pid_token = tokens.next().ok_or(ParseLineError::Empty)?;
    let pid: u32 = pid_token
        .parse()
        .map_err(|_| ParseLineError::BadPid(pid_token.to_string()))?;
    if pid == 0 {
        return Err(ParseLineError::BadPid(pid_token.to_string()));
    }

    let timestamp_tokens: Vec<&str> = tokens.by_ref().take(TIMESTAMP_TOKENS).collect();
    if timestamp_tokens.len() < TIMESTAMP_TOKENS {
        return Err(ParseLineError::MissingFields);
    }
    let timestamp_text = timestamp_tokens.join(" ");
    let start_time = parse_start_time(&timestamp_text)
        .ok_or_else(|| ParseLineError::BadTimestamp(timestamp_text.clone()))?;

    let command = tokens.collect::<Vec<_>>().join(" ");
    if command.is_empty() {
        return Err(ParseLineError::MissingFields);
    }

    Ok(ProcessRecord {
        pid,
        start_time,
        command,
    })
}

fn parse_start_time(text: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).ok()?;
    // `earliest` picks the first valid instant when a DST transition makes
    // the local time ambiguous; a nonexistent local time yields None.
    naive.and_local_timezone(Local).earliest()
}

/// Parse a batch of raw lines into a [`Snapshot`], preserving input order.
///
/// Malformed lines are dropped with a warning; they reduce the snapshot by
/// one record and are never fatal.
pub fn parse_records(lines: &[String]) -> Snapshot {
    lines
        .iter()
        .filter_map(|line| match parse_line(line) {
            Ok(record) => Some(record),
            Err(ParseLineError::Empty) => None,
            Err(e) => {
                warn!(line = %line.trim(), error = %e, "dropping unparsable process-table line");
                None
            }
        })
        .collect()
}
