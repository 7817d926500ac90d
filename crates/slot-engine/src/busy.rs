//! Busy intervals reported by a calendar and the half-open overlap test.
//!
//! Intervals are taken as authoritative: they are neither merged nor
//! validated. Adjacent ranges (one ends exactly when the other starts) do NOT
//! overlap.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// An occupied period on a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether `[start, end)` shares any instant with this interval.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        overlaps(start, end, self.start, self.end)
    }
}

/// Half-open overlap: `[a_start, a_end)` and `[b_start, b_end)` overlap iff
/// `a_start < b_end && a_end > b_start`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 with any offset (e.g., "2026-03-17T09:00:00-05:00") and naive
/// datetimes (e.g., "2026-03-17T14:00:00"), which are interpreted as UTC.
///
/// # Errors
/// Returns `SlotError::InvalidDate` if neither form parses.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| SlotError::InvalidDate(format!("'{}': {}", s, e)))
}

#[derive(Deserialize)]
struct RawInterval {
    start: String,
    end: String,
}

/// Decode a JSON array of `{start, end}` objects into busy intervals.
///
/// # Errors
/// Returns `SlotError::InvalidDate` for malformed JSON or datetimes.
pub fn parse_busy_json(json: &str) -> Result<Vec<BusyInterval>> {
    let raw: Vec<RawInterval> = serde_json::from_str(json)
        .map_err(|e| SlotError::InvalidDate(format!("invalid busy intervals JSON: {}", e)))?;

    raw.into_iter()
        .map(|r| Ok(BusyInterval::new(parse_instant(&r.start)?, parse_instant(&r.end)?)))
        .collect()
}
