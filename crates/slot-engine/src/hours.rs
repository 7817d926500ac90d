//! Per-tenant business-hours configuration.
//!
//! A [`BusinessHoursConfig`] is what the client configuration store hands the
//! calculator: a timezone, the local opening and closing wall-clock times, and
//! the appointment length. Times are `HH:MM` strings on the wire; `24:00` is
//! accepted as a closing time meaning midnight at the end of the day.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// A local wall-clock time with minute precision, `00:00` through `24:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocalTime {
    minutes: u16,
}

impl LocalTime {
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self> {
        if minute >= 60 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(SlotError::InvalidBusinessHours(format!(
                "{:02}:{:02} is not a valid local time",
                hour, minute
            )));
        }
        Ok(Self {
            minutes: hour * 60 + minute,
        })
    }

    /// Minutes since local midnight.
    pub fn minutes_from_midnight(&self) -> u16 {
        self.minutes
    }

    /// The naive local datetime this time denotes on `date`.
    ///
    /// `24:00` rolls over to midnight of the following day.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(self.minutes))
    }
}

impl FromStr for LocalTime {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SlotError::InvalidBusinessHours(format!("expected HH:MM, got '{}'", s));

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(hour) || hour.len() > 2 || !digits(minute) || minute.len() != 2 {
            return Err(invalid());
        }

        let hour: u16 = hour.parse().map_err(|_| invalid())?;
        let minute: u16 = minute.parse().map_err(|_| invalid())?;
        LocalTime::from_hm(hour, minute)
    }
}

impl TryFrom<String> for LocalTime {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<LocalTime> for String {
    fn from(value: LocalTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

/// Business hours, timezone and appointment length for one tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessHoursConfig {
    /// IANA timezone identifier (e.g., "America/Chicago").
    pub timezone: String,
    /// Local opening time.
    #[serde(alias = "dayStart")]
    pub day_start: LocalTime,
    /// Local closing time. Slots never extend past it.
    #[serde(alias = "dayEnd")]
    pub day_end: LocalTime,
    /// Appointment length. Must be greater than zero.
    #[serde(alias = "slotDurationMinutes")]
    pub slot_duration_minutes: i64,
    /// Fixed UTC offset used when `timezone` cannot be resolved.
    /// `None` makes an unknown timezone an input error.
    #[serde(default, alias = "fallbackUtcOffsetMinutes")]
    pub fallback_utc_offset_minutes: Option<i32>,
}

impl BusinessHoursConfig {
    pub fn new(
        timezone: impl Into<String>,
        day_start: LocalTime,
        day_end: LocalTime,
        slot_duration_minutes: i64,
    ) -> Self {
        Self {
            timezone: timezone.into(),
            day_start,
            day_end,
            slot_duration_minutes,
            fallback_utc_offset_minutes: None,
        }
    }

    pub fn with_fallback_offset(mut self, minutes: i32) -> Self {
        self.fallback_utc_offset_minutes = Some(minutes);
        self
    }

    /// Check the invariants that do not depend on the target date.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidSlotDuration` for a zero or negative duration and
    /// `SlotError::InvalidBusinessHours` when the day does not open before it closes
    /// or the fallback offset is outside ±18 hours.
    pub fn validate(&self) -> Result<()> {
        if self.slot_duration_minutes <= 0 {
            return Err(SlotError::InvalidSlotDuration(self.slot_duration_minutes));
        }
        if self.day_start >= self.day_end {
            return Err(SlotError::InvalidBusinessHours(format!(
                "day start {} must be before day end {}",
                self.day_start, self.day_end
            )));
        }
        if let Some(offset) = self.fallback_utc_offset_minutes {
            if offset.abs() > 18 * 60 {
                return Err(SlotError::InvalidBusinessHours(format!(
                    "fallback offset {} minutes is out of range",
                    offset
                )));
            }
        }
        Ok(())
    }

    pub fn slot_duration(&self) -> Duration {
        Duration::minutes(self.slot_duration_minutes)
    }
}
