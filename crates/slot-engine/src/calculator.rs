//! Bookable-slot computation for a single business day.
//!
//! The business day `[day_start, day_end)` is resolved to instants using the
//! offset in force on the target date, partitioned into consecutive fixed-length
//! candidate slots starting at `day_start` (a trailing partial slot is dropped),
//! and every candidate that overlaps any busy interval is discarded.
//!
//! Computation is pure: no clock reads, no I/O. Identical inputs always yield an
//! identical, chronologically ordered slot list.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::busy::BusyInterval;
use crate::error::{Result, SlotError};
use crate::hours::BusinessHoursConfig;
use crate::timezone::{BusinessZone, DstPolicy};

/// A fixed-length window considered for booking before busy filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A candidate that survived busy filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// `start` rendered as local wall-clock text in the business timezone.
    pub start_formatted: String,
}

/// Available slots for one business day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityResult {
    /// The local calendar date the slots belong to.
    pub date: NaiveDate,
    /// The zone the business hours were resolved in.
    pub timezone: String,
    /// Business-day opening instant.
    pub window_start: DateTime<Utc>,
    /// Business-day closing instant.
    pub window_end: DateTime<Utc>,
    /// Available slots, sorted by start.
    pub slots: Vec<AvailableSlot>,
    /// Number of candidate slots generated before busy filtering.
    pub candidates_considered: usize,
}

impl AvailabilityResult {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Compute the available slots for `target_date`.
///
/// Uses [`DstPolicy::ShiftForward`] for business-day boundaries that fall in a
/// DST transition.
///
/// # Errors
/// Returns `SlotError::InvalidSlotDuration` or `SlotError::InvalidBusinessHours`
/// for a bad configuration and `SlotError::InvalidTimezone` for an unresolvable
/// timezone without a fallback offset. No partial result is produced.
pub fn compute_availability(
    config: &BusinessHoursConfig,
    busy: &[BusyInterval],
    target_date: NaiveDate,
) -> Result<AvailabilityResult> {
    compute_availability_with_policy(config, busy, target_date, DstPolicy::default())
}

/// [`compute_availability`] with an explicit DST boundary policy.
pub fn compute_availability_with_policy(
    config: &BusinessHoursConfig,
    busy: &[BusyInterval],
    target_date: NaiveDate,
    policy: DstPolicy,
) -> Result<AvailabilityResult> {
    config.validate()?;
    let zone = BusinessZone::resolve(&config.timezone, config.fallback_utc_offset_minutes)?;
    let window = business_day_window(config, &zone, target_date, policy)?;
    availability_in_window(config, &zone, busy, target_date, window)
}

/// Filter the candidate slots of an already-resolved business-day window.
///
/// For callers that resolved the zone and window themselves (e.g. to query a
/// busy provider for exactly that window) and should not resolve them twice.
///
/// # Errors
/// Returns `SlotError::InvalidSlotDuration` for a zero or negative duration.
pub fn availability_in_window(
    config: &BusinessHoursConfig,
    zone: &BusinessZone,
    busy: &[BusyInterval],
    target_date: NaiveDate,
    (window_start, window_end): (DateTime<Utc>, DateTime<Utc>),
) -> Result<AvailabilityResult> {
    let candidates = candidate_slots(window_start, window_end, config.slot_duration_minutes)?;
    let candidates_considered = candidates.len();

    let slots: Vec<AvailableSlot> = candidates
        .into_iter()
        .filter(|slot| !busy.iter().any(|b| b.overlaps(slot.start, slot.end)))
        .map(|slot| AvailableSlot {
            start: slot.start,
            end: slot.end,
            start_formatted: zone.format_local(slot.start),
        })
        .collect();

    debug!(
        date = %target_date,
        timezone = %zone,
        candidates = candidates_considered,
        busy = busy.len(),
        available = slots.len(),
        "computed availability"
    );

    Ok(AvailabilityResult {
        date: target_date,
        timezone: zone.to_string(),
        window_start,
        window_end,
        slots,
        candidates_considered,
    })
}

/// Resolve the opening and closing instants of the business day on `date`.
///
/// A day whose hours fall entirely inside a spring-forward gap resolves to an
/// empty window (`start == end`) and therefore yields no slots.
///
/// # Errors
/// Returns `SlotError::InvalidBusinessHours` if `policy` is `Strict` and a
/// boundary is nonexistent or ambiguous, or if the closing instant resolves
/// before the opening instant.
pub fn business_day_window(
    config: &BusinessHoursConfig,
    zone: &BusinessZone,
    date: NaiveDate,
    policy: DstPolicy,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = zone.local_to_utc(config.day_start.on(date), policy)?;
    let end = zone.local_to_utc(config.day_end.on(date), policy)?;
    if start > end {
        return Err(SlotError::InvalidBusinessHours(format!(
            "business day {} {}-{} closes before it opens in {}",
            date, config.day_start, config.day_end, zone
        )));
    }
    Ok((start, end))
}

/// Partition `[window_start, window_end)` into consecutive slots of
/// `duration_minutes`, starting at `window_start`. No partial slots.
///
/// # Errors
/// Returns `SlotError::InvalidSlotDuration` for a zero or negative duration.
pub fn candidate_slots(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    duration_minutes: i64,
) -> Result<Vec<CandidateSlot>> {
    if duration_minutes <= 0 {
        return Err(SlotError::InvalidSlotDuration(duration_minutes));
    }

    let window_seconds = (window_end - window_start).num_seconds();
    let count = match duration_minutes.checked_mul(60) {
        Some(slot_seconds) if window_seconds > 0 => window_seconds / slot_seconds,
        _ => 0,
    };
    if count == 0 {
        return Ok(Vec::new());
    }

    let slot = Duration::minutes(duration_minutes);
    let mut slots = Vec::with_capacity(count as usize);
    let mut cursor = window_start;
    for _ in 0..count {
        let end = cursor + slot;
        slots.push(CandidateSlot { start: cursor, end });
        cursor = end;
    }

    Ok(slots)
}

/// Resolve the caller's requested date.
///
/// `None` or a blank string means "tomorrow": the local date, in `zone`, of
/// `now + 24h`. Otherwise the value must be a `YYYY-MM-DD` calendar date.
///
/// # Errors
/// Returns `SlotError::InvalidDate` for anything that is not a valid date.
pub fn resolve_target_date(
    raw: Option<&str>,
    now: DateTime<Utc>,
    zone: &BusinessZone,
) -> Result<NaiveDate> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| SlotError::InvalidDate(format!("'{}': {}", s, e))),
        None => Ok(zone.date_of(now + Duration::hours(24))),
    }
}
