//! The log entry model: one (timestamp, transcript) row.
//!
//! An entry is only ever constructed from a successful, non-empty
//! transcription. The timestamp is the current wall-clock time in the
//! configured timezone, formatted to match the rows the spreadsheet
//! already holds.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Timestamp format used for the first spreadsheet column.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row destined for the spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub transcript: String,
}

impl LogEntry {
    /// Build an entry stamped with the current time in `tz`.
    pub fn now(transcript: impl Into<String>, tz: Tz) -> Self {
        Self::at(Utc::now(), transcript, tz)
    }

    /// Build an entry for an explicit instant. Split out from [`LogEntry::now`]
    /// so the timestamp formatting is testable.
    pub fn at(instant: DateTime<Utc>, transcript: impl Into<String>, tz: Tz) -> Self {
        let local = instant.with_timezone(&tz);
        Self {
            timestamp: local.format(TIMESTAMP_FORMAT).to_string(),
            transcript: transcript.into(),
        }
    }
}

/// Parse an IANA timezone name (e.g. "America/Buenos_Aires").
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| {
        anyhow!(
            "Unknown timezone: '{}'. Use an IANA name like America/Buenos_Aires",
            name
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_uses_configured_timezone() {
        let tz = parse_timezone("America/Buenos_Aires").unwrap();
        // Buenos Aires is UTC-3 year-round.
        let instant = Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap();
        let entry = LogEntry::at(instant, "hello world", tz);
        assert_eq!(entry.timestamp, "2024-01-02 12:04:05");
        assert_eq!(entry.transcript, "hello world");
    }

    #[test]
    fn timestamp_matches_expected_shape() {
        let tz = parse_timezone("UTC").unwrap();
        let entry = LogEntry::now("x", tz);
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(entry.timestamp.len(), 19);
        assert_eq!(&entry.timestamp[4..5], "-");
        assert_eq!(&entry.timestamp[10..11], " ");
        assert_eq!(&entry.timestamp[13..14], ":");
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert!(parse_timezone("America/Nowhere").is_err());
    }
}
