//! Timestamp handling for weather series, ledger keys and operator queries.
//!
//! Ledger keys are parsed timestamps, so ordering is chronological no matter
//! how the input file spelled them. Output always uses [`CANONICAL_FORMAT`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

use crate::{WsError, WsResult};

pub type Timestamp = NaiveDateTime;

/// `YYYY-MM-DD HH:MM:SS`, the format written to every output file.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%dT%H:%M:%S%:z"];

pub fn parse_timestamp(text: &str) -> WsResult<Timestamp> {
    let trimmed = text.trim();
    for fmt in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(ts);
        }
    }
    // Offsets are dropped: the series is interpreted in its own wall-clock time.
    for fmt in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(ts.naive_local());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| WsError::Timestamp {
            text: text.to_string(),
        })
}

pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(CANONICAL_FORMAT).to_string()
}

/// Hour of day (0-23), truncated.
pub fn hour_of(ts: &Timestamp) -> u32 {
    ts.hour()
}

/// True when `ts` sits a whole number of hours after `origin`.
pub fn on_hour_grid(origin: &Timestamp, ts: &Timestamp) -> bool {
    let offset = *ts - *origin;
    offset.subsec_nanos() == 0 && offset.num_seconds() % 3600 == 0
}

/// Start of the hour containing `ts`.
pub fn floor_hour(ts: &Timestamp) -> Timestamp {
    ts.date()
        .and_hms_opt(ts.hour(), 0, 0)
        .unwrap_or(*ts)
}
