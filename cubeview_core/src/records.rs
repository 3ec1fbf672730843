//! Raw session records and the delimited-text ingest contract.
//!
//! The Record Source delivers a fixed 9-column schema:
//! `user_id,hour,day_type,device,content_type,session_minutes,recommended,completed,is_binge`
//! where `recommended` is `yes`/`no` and the remaining flags are `1`/`0`.
//! This crate does not own the format; it only parses it losslessly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column order of the external delimited-text contract.
pub const EXPECTED_HEADER: [&str; 9] = [
    "user_id",
    "hour",
    "day_type",
    "device",
    "content_type",
    "session_minutes",
    "recommended",
    "completed",
    "is_binge",
];

/// One observed user session. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: String,
    /// Hour of day the session started [0, 23]
    pub hour: u8,
    /// Day-context tag (X axis)
    pub day_type: String,
    /// Device tag (Y axis)
    pub device: String,
    /// Content-category tag (Z axis)
    pub content_type: String,
    /// Session duration in minutes
    pub minutes: f64,
    /// Session was started from a recommendation
    pub recommended: bool,
    /// Content was watched/listened to completion
    pub completed: bool,
    /// Session was part of a binge run
    pub binge: bool,
}

/// Errors raised while parsing the delimited-text input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The input has no header line.
    #[error("input has no header line")]
    MissingHeader,

    /// The header does not match the fixed column schema.
    #[error("line 1: unexpected header '{0}'")]
    BadHeader(String),

    /// A data line has the wrong number of columns.
    #[error("line {line}: expected 9 columns, found {found}")]
    ColumnCount { line: usize, found: usize },

    /// A field failed to parse or is out of range.
    #[error("line {line}: invalid {field} '{value}'")]
    BadField {
        line: usize,
        field: &'static str,
        value: String,
    },
}

/// Parse the full delimited-text input into session records.
///
/// Blank lines and surrounding whitespace are tolerated; any malformed
/// line aborts the parse with a typed error carrying its line number.
pub fn parse_records(input: &str) -> Result<Vec<SessionRecord>, ParseError> {
    let mut lines = input.trim().lines().enumerate();

    let (_, header) = lines.next().ok_or(ParseError::MissingHeader)?;
    let header_cols: Vec<&str> = header.split(',').map(str::trim).collect();
    if header_cols != EXPECTED_HEADER {
        return Err(ParseError::BadHeader(header.trim().to_string()));
    }

    let mut records = Vec::new();
    for (idx, raw) in lines {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let cols: Vec<&str> = line.split(',').map(str::trim).collect();
        if cols.len() != EXPECTED_HEADER.len() {
            return Err(ParseError::ColumnCount {
                line: line_no,
                found: cols.len(),
            });
        }

        records.push(SessionRecord {
            user_id: cols[0].to_string(),
            hour: parse_hour(line_no, cols[1])?,
            day_type: cols[2].to_string(),
            device: cols[3].to_string(),
            content_type: cols[4].to_string(),
            minutes: parse_minutes(line_no, cols[5])?,
            recommended: parse_yes_no(line_no, cols[6])?,
            completed: parse_bit(line_no, "completed", cols[7])?,
            binge: parse_bit(line_no, "is_binge", cols[8])?,
        });
    }

    Ok(records)
}

fn parse_hour(line: usize, value: &str) -> Result<u8, ParseError> {
    value
        .parse::<u8>()
        .ok()
        .filter(|h| *h <= 23)
        .ok_or_else(|| ParseError::BadField {
            line,
            field: "hour",
            value: value.to_string(),
        })
}

fn parse_minutes(line: usize, value: &str) -> Result<f64, ParseError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite() && *m >= 0.0)
        .ok_or_else(|| ParseError::BadField {
            line,
            field: "session_minutes",
            value: value.to_string(),
        })
}

fn parse_yes_no(line: usize, value: &str) -> Result<bool, ParseError> {
    match value {
        "yes" => Ok(true),
        "no" => Ok(false),
        other => Err(ParseError::BadField {
            line,
            field: "recommended",
            value: other.to_string(),
        }),
    }
}

fn parse_bit(line: usize, field: &'static str, value: &str) -> Result<bool, ParseError> {
    match value {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(ParseError::BadField {
            line,
            field,
            value: other.to_string(),
        }),
    }
}
