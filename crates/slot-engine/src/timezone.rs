//! Business timezone resolution and DST-aware local→UTC conversion.
//!
//! The offset applied to a wall-clock time is the one in force on that date
//! according to the IANA database (`chrono-tz`). A fixed offset is only used
//! when the tenant's identifier does not resolve and a fallback is configured.

use std::fmt;

use chrono::offset::LocalResult;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::{Result, SlotError};

/// Human-readable slot format, e.g. "Tuesday, March 17 at 9:00 AM".
pub const SLOT_DISPLAY_FORMAT: &str = "%A, %B %-d at %-I:%M %p";

/// Policy for local business-day boundaries that fall in a DST transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstPolicy {
    /// A time inside a spring-forward gap moves to the first wall-clock time
    /// after the gap (02:30 becomes 03:00). A time inside a fall-back fold takes
    /// the earlier of its two instants. The mapping never reorders two local
    /// times, so an ordered business day stays ordered.
    #[default]
    ShiftForward,
    /// Nonexistent or ambiguous local times are rejected.
    Strict,
}

/// The timezone a tenant's business hours are expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BusinessZone {
    /// A real IANA zone with its full transition history.
    Iana(Tz),
    /// A fixed offset, used only as a fallback for unresolvable identifiers.
    Fixed(FixedOffset),
}

impl BusinessZone {
    /// Resolve a timezone identifier, falling back to a fixed offset if one is given.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidTimezone` if the identifier is not a valid IANA
    /// name and no fallback offset is configured (or the offset is out of range).
    pub fn resolve(identifier: &str, fallback_utc_offset_minutes: Option<i32>) -> Result<Self> {
        if let Ok(tz) = identifier.trim().parse::<Tz>() {
            return Ok(BusinessZone::Iana(tz));
        }

        let Some(minutes) = fallback_utc_offset_minutes else {
            return Err(SlotError::InvalidTimezone(identifier.to_string()));
        };
        let offset = FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
            SlotError::InvalidTimezone(format!(
                "{} (fallback offset {} minutes out of range)",
                identifier, minutes
            ))
        })?;

        warn!(
            timezone = identifier,
            fallback_offset_minutes = minutes,
            "unresolvable timezone, using fixed fallback offset"
        );
        Ok(BusinessZone::Fixed(offset))
    }

    /// Convert a local wall-clock datetime to an instant.
    ///
    /// # Errors
    /// Under `DstPolicy::Strict`, returns `SlotError::InvalidBusinessHours` when the
    /// local time does not exist or is ambiguous on that date.
    pub fn local_to_utc(&self, local: NaiveDateTime, policy: DstPolicy) -> Result<DateTime<Utc>> {
        match self {
            BusinessZone::Iana(tz) => resolve_local(tz, local, policy),
            BusinessZone::Fixed(offset) => resolve_local(offset, local, policy),
        }
    }

    /// The local calendar date of `instant` in this zone.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            BusinessZone::Iana(tz) => instant.with_timezone(tz).date_naive(),
            BusinessZone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// Render `instant` as local wall-clock text using [`SLOT_DISPLAY_FORMAT`].
    pub fn format_local(&self, instant: DateTime<Utc>) -> String {
        match self {
            BusinessZone::Iana(tz) => instant
                .with_timezone(tz)
                .format(SLOT_DISPLAY_FORMAT)
                .to_string(),
            BusinessZone::Fixed(offset) => instant
                .with_timezone(offset)
                .format(SLOT_DISPLAY_FORMAT)
                .to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, BusinessZone::Fixed(_))
    }
}

impl fmt::Display for BusinessZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessZone::Iana(tz) => write!(f, "{}", tz.name()),
            BusinessZone::Fixed(offset) => write!(f, "UTC{}", offset),
        }
    }
}

fn resolve_local<Z: TimeZone>(
    zone: &Z,
    local: NaiveDateTime,
    policy: DstPolicy,
) -> Result<DateTime<Utc>> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => match policy {
            DstPolicy::ShiftForward => Ok(earliest.with_timezone(&Utc)),
            DstPolicy::Strict => Err(SlotError::InvalidBusinessHours(format!(
                "local time {} is ambiguous (DST fold)",
                local
            ))),
        },
        LocalResult::None => match policy {
            DstPolicy::ShiftForward => first_valid_after_gap(zone, local),
            DstPolicy::Strict => Err(SlotError::InvalidBusinessHours(format!(
                "local time {} does not exist (DST gap)",
                local
            ))),
        },
    }
}

/// Longest gap searched for; real-world gaps are at most a day.
const MAX_GAP_MINUTES: i64 = 2 * 24 * 60;

fn first_valid_after_gap<Z: TimeZone>(zone: &Z, local: NaiveDateTime) -> Result<DateTime<Utc>> {
    (1..=MAX_GAP_MINUTES)
        .map(|m| local + Duration::minutes(m))
        .find_map(|candidate| zone.from_local_datetime(&candidate).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            SlotError::InvalidBusinessHours(format!("no valid local time after {}", local))
        })
}
