//! Tests for single-day slot computation.

use chrono::{NaiveDate, TimeZone, Utc};
use slot_engine::calculator::{candidate_slots, compute_availability_with_policy};
use slot_engine::{
    compute_availability, resolve_target_date, BusinessHoursConfig, BusinessZone, BusyInterval,
    DstPolicy, ErrorKind, SlotError,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn hours(timezone: &str, start: &str, end: &str, slot_minutes: i64) -> BusinessHoursConfig {
    BusinessHoursConfig::new(
        timezone,
        start.parse().unwrap(),
        end.parse().unwrap(),
        slot_minutes,
    )
}

fn busy(start: &str, end: &str) -> BusyInterval {
    BusyInterval::new(start.parse().unwrap(), end.parse().unwrap())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Tuesday 2026-03-17, America/Chicago is on CDT (UTC-5): 08:00 local = 13:00Z.
const CHICAGO: &str = "America/Chicago";

// ── Scenario 1: open day, hourly slots ──────────────────────────────────────

#[test]
fn open_day_yields_nine_hourly_slots() {
    let config = hours(CHICAGO, "08:00", "17:00", 60);

    let result = compute_availability(&config, &[], date(2026, 3, 17)).unwrap();

    assert_eq!(result.slots.len(), 9);
    assert_eq!(result.candidates_considered, 9);
    assert_eq!(
        result.slots[0].start,
        Utc.with_ymd_and_hms(2026, 3, 17, 13, 0, 0).unwrap()
    );
    assert_eq!(result.slots[0].start_formatted, "Tuesday, March 17 at 8:00 AM");
    assert_eq!(
        result.slots[8].start,
        Utc.with_ymd_and_hms(2026, 3, 17, 21, 0, 0).unwrap()
    );
    assert_eq!(result.slots[8].start_formatted, "Tuesday, March 17 at 4:00 PM");
    assert_eq!(result.timezone, CHICAGO);
    assert!(!result.is_empty());
}

// ── Scenario 2: one busy hour removes exactly one slot ──────────────────────

#[test]
fn busy_hour_removes_matching_slot() {
    let config = hours(CHICAGO, "08:00", "17:00", 60);
    // 09:00-10:00 CDT
    let busy = vec![busy("2026-03-17T14:00:00Z", "2026-03-17T15:00:00Z")];

    let result = compute_availability(&config, &busy, date(2026, 3, 17)).unwrap();

    assert_eq!(result.slots.len(), 8);
    let nine_am = Utc.with_ymd_and_hms(2026, 3, 17, 14, 0, 0).unwrap();
    assert!(result.slots.iter().all(|s| s.start != nine_am));
    assert_eq!(result.candidates_considered, 9);
}

#[test]
fn busy_interval_with_local_offset_is_honored() {
    let config = hours(CHICAGO, "08:00", "17:00", 60);
    let busy = vec![busy("2026-03-17T09:00:00-05:00", "2026-03-17T10:00:00-05:00")];

    let result = compute_availability(&config, &busy, date(2026, 3, 17)).unwrap();

    assert_eq!(result.slots.len(), 8);
    assert!(result
        .slots
        .iter()
        .all(|s| s.start_formatted != "Tuesday, March 17 at 9:00 AM"));
}

// ── Scenario 3: non-positive duration is a configuration failure ────────────

#[test]
fn zero_slot_duration_is_rejected() {
    let config = hours(CHICAGO, "08:00", "17:00", 0);

    let err = compute_availability(&config, &[], date(2026, 3, 17)).unwrap_err();

    assert_eq!(err, SlotError::InvalidSlotDuration(0));
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
}

#[test]
fn negative_slot_duration_is_rejected() {
    let config = hours(CHICAGO, "08:00", "17:00", -30);

    let err = compute_availability(&config, &[], date(2026, 3, 17)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
}

#[test]
fn unordered_business_hours_are_rejected() {
    let config = hours(CHICAGO, "17:00", "08:00", 60);

    let err = compute_availability(&config, &[], date(2026, 3, 17)).unwrap_err();

    assert!(matches!(err, SlotError::InvalidBusinessHours(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
}

// ── Scenario 4: window shorter than one slot ────────────────────────────────

#[test]
fn window_shorter_than_slot_is_empty_but_valid() {
    let config = hours(CHICAGO, "08:00", "08:30", 60);

    let result = compute_availability(&config, &[], date(2026, 3, 17)).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.candidates_considered, 0);
}

#[test]
fn huge_slot_duration_is_empty_not_a_panic() {
    let config = hours(CHICAGO, "08:00", "17:00", i64::MAX);

    let result = compute_availability(&config, &[], date(2026, 3, 17)).unwrap();

    assert!(result.is_empty());
}

// ── Partitioning ────────────────────────────────────────────────────────────

#[test]
fn trailing_partial_slot_is_dropped() {
    // 540 minutes / 50 = 10 full slots; the 11th would end at 17:10.
    let config = hours(CHICAGO, "08:00", "17:00", 50);

    let result = compute_availability(&config, &[], date(2026, 3, 17)).unwrap();

    assert_eq!(result.slots.len(), 10);
    let last = result.slots.last().unwrap();
    assert_eq!(last.start, Utc.with_ymd_and_hms(2026, 3, 17, 20, 30, 0).unwrap());
    assert_eq!(last.end, Utc.with_ymd_and_hms(2026, 3, 17, 21, 20, 0).unwrap());
    assert!(last.end <= result.window_end);
}

#[test]
fn slots_are_consecutive_from_day_start() {
    let start = Utc.with_ymd_and_hms(2026, 3, 17, 13, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2026, 3, 17, 15, 0, 0).unwrap();

    let slots = candidate_slots(start, end, 30).unwrap();

    assert_eq!(slots.len(), 4);
    assert_eq!(slots[0].start, start);
    for pair in slots.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    assert_eq!(slots[3].end, end);
}

#[test]
fn closing_at_midnight_uses_next_day_boundary() {
    let config = hours("UTC", "22:00", "24:00", 60);

    let result = compute_availability(&config, &[], date(2026, 3, 17)).unwrap();

    assert_eq!(result.slots.len(), 2);
    assert_eq!(result.window_end, Utc.with_ymd_and_hms(2026, 3, 18, 0, 0, 0).unwrap());
}

// ── Half-open overlap boundaries ────────────────────────────────────────────

#[test]
fn busy_exactly_matching_slot_blocks_it() {
    let config = hours("UTC", "08:00", "10:00", 60);
    let busy = vec![busy("2026-03-17T08:00:00Z", "2026-03-17T09:00:00Z")];

    let result = compute_availability(&config, &busy, date(2026, 3, 17)).unwrap();

    assert_eq!(result.slots.len(), 1);
    assert_eq!(result.slots[0].start, Utc.with_ymd_and_hms(2026, 3, 17, 9, 0, 0).unwrap());
}

#[test]
fn busy_ending_at_slot_start_does_not_block() {
    let config = hours("UTC", "09:00", "10:00", 60);
    let busy = vec![busy("2026-03-17T08:00:00Z", "2026-03-17T09:00:00Z")];

    let result = compute_availability(&config, &busy, date(2026, 3, 17)).unwrap();

    assert_eq!(result.slots.len(), 1);
}

#[test]
fn busy_starting_at_slot_end_does_not_block() {
    let config = hours("UTC", "08:00", "09:00", 60);
    let busy = vec![busy("2026-03-17T09:00:00Z", "2026-03-17T10:00:00Z")];

    let result = compute_availability(&config, &busy, date(2026, 3, 17)).unwrap();

    assert_eq!(result.slots.len(), 1);
}

#[test]
fn one_minute_straddle_blocks_both_neighbours() {
    let config = hours("UTC", "08:00", "10:00", 60);
    let busy = vec![busy("2026-03-17T08:59:00Z", "2026-03-17T09:01:00Z")];

    let result = compute_availability(&config, &busy, date(2026, 3, 17)).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.candidates_considered, 2);
}

#[test]
fn overlapping_busy_intervals_are_handled_individually() {
    let config = hours("UTC", "08:00", "12:00", 60);
    let busy = vec![
        busy("2026-03-17T08:30:00Z", "2026-03-17T09:30:00Z"),
        busy("2026-03-17T09:00:00Z", "2026-03-17T09:45:00Z"),
        busy("2026-03-17T09:00:00Z", "2026-03-17T09:45:00Z"),
    ];

    let result = compute_availability(&config, &busy, date(2026, 3, 17)).unwrap();

    let starts: Vec<u32> = result
        .slots
        .iter()
        .map(|s| chrono::Timelike::hour(&s.start))
        .collect();
    assert_eq!(starts, vec![10, 11]);
}

#[test]
fn busy_outside_business_day_is_ignored() {
    let config = hours(CHICAGO, "08:00", "17:00", 60);
    let busy = vec![
        busy("2026-03-16T14:00:00Z", "2026-03-16T15:00:00Z"),
        busy("2026-03-18T14:00:00Z", "2026-03-18T15:00:00Z"),
    ];

    let result = compute_availability(&config, &busy, date(2026, 3, 17)).unwrap();

    assert_eq!(result.slots.len(), 9);
}

#[test]
fn all_day_busy_leaves_no_slots() {
    let config = hours(CHICAGO, "08:00", "17:00", 30);
    let busy = vec![busy("2026-03-17T05:00:00Z", "2026-03-18T05:00:00Z")];

    let result = compute_availability(&config, &busy, date(2026, 3, 17)).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.candidates_considered, 18);
}

#[test]
fn identical_inputs_yield_identical_results() {
    let config = hours(CHICAGO, "08:00", "17:00", 30);
    let busy = vec![
        busy("2026-03-17T15:15:00Z", "2026-03-17T16:40:00Z"),
        busy("2026-03-17T13:00:00Z", "2026-03-17T13:30:00Z"),
    ];

    let a = compute_availability(&config, &busy, date(2026, 3, 17)).unwrap();
    let b = compute_availability(&config, &busy, date(2026, 3, 17)).unwrap();

    assert_eq!(a, b);
}

// ── Daylight saving time ────────────────────────────────────────────────────

#[test]
fn offset_follows_the_target_date_across_spring_forward() {
    let config = hours("America/New_York", "08:00", "17:00", 60);

    // Saturday: EST (UTC-5)
    let before = compute_availability(&config, &[], date(2026, 3, 7)).unwrap();
    // Sunday: EDT (UTC-4)
    let after = compute_availability(&config, &[], date(2026, 3, 8)).unwrap();

    assert_eq!(before.window_start, Utc.with_ymd_and_hms(2026, 3, 7, 13, 0, 0).unwrap());
    assert_eq!(after.window_start, Utc.with_ymd_and_hms(2026, 3, 8, 12, 0, 0).unwrap());
    assert_eq!(before.slots[0].start_formatted, "Saturday, March 7 at 8:00 AM");
    assert_eq!(after.slots[0].start_formatted, "Sunday, March 8 at 8:00 AM");
    assert_eq!(after.slots.len(), 9);
}

#[test]
fn opening_inside_spring_forward_gap_shifts_forward() {
    // 02:30 does not exist on 2026-03-08 in New York; the day opens at 03:00 EDT.
    let config = hours("America/New_York", "02:30", "05:00", 30);

    let result = compute_availability(&config, &[], date(2026, 3, 8)).unwrap();

    assert_eq!(result.window_start, Utc.with_ymd_and_hms(2026, 3, 8, 7, 0, 0).unwrap());
    assert_eq!(result.window_end, Utc.with_ymd_and_hms(2026, 3, 8, 9, 0, 0).unwrap());
    assert_eq!(result.slots.len(), 4);
    assert_eq!(result.slots[0].start_formatted, "Sunday, March 8 at 3:00 AM");
}

#[test]
fn hours_entirely_inside_gap_yield_no_slots() {
    let config = hours("America/New_York", "02:10", "02:50", 15);

    let result = compute_availability(&config, &[], date(2026, 3, 8)).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.window_start, result.window_end);
}

#[test]
fn closing_inside_gap_keeps_window_ordered() {
    // London springs forward at 01:00 GMT on 2027-03-28; 01:59 becomes 02:00 BST.
    let config = hours("Europe/London", "00:00", "01:59", 30);

    let result = compute_availability(&config, &[], date(2027, 3, 28)).unwrap();

    assert_eq!(result.window_end, Utc.with_ymd_and_hms(2027, 3, 28, 1, 0, 0).unwrap());
    assert_eq!(result.slots.len(), 2);
}

#[test]
fn strict_policy_rejects_nonexistent_opening() {
    let config = hours("America/New_York", "02:30", "05:00", 30);

    let err = compute_availability_with_policy(&config, &[], date(2026, 3, 8), DstPolicy::Strict)
        .unwrap_err();

    assert!(matches!(err, SlotError::InvalidBusinessHours(_)));
}

#[test]
fn fall_back_fold_uses_earlier_instant_and_keeps_both_one_am_hours() {
    // 01:00 happens twice on 2026-11-01 in New York.
    let config = hours("America/New_York", "01:00", "03:00", 60);

    let result = compute_availability(&config, &[], date(2026, 11, 1)).unwrap();

    assert_eq!(result.window_start, Utc.with_ymd_and_hms(2026, 11, 1, 5, 0, 0).unwrap());
    assert_eq!(result.window_end, Utc.with_ymd_and_hms(2026, 11, 1, 8, 0, 0).unwrap());
    let formatted: Vec<&str> = result
        .slots
        .iter()
        .map(|s| s.start_formatted.as_str())
        .collect();
    assert_eq!(
        formatted,
        vec![
            "Sunday, November 1 at 1:00 AM",
            "Sunday, November 1 at 1:00 AM",
            "Sunday, November 1 at 2:00 AM",
        ]
    );
}

#[test]
fn strict_policy_rejects_ambiguous_opening() {
    let config = hours("America/New_York", "01:00", "03:00", 60);

    let err = compute_availability_with_policy(&config, &[], date(2026, 11, 1), DstPolicy::Strict)
        .unwrap_err();

    assert!(matches!(err, SlotError::InvalidBusinessHours(_)));
}

// ── Timezone resolution ─────────────────────────────────────────────────────

#[test]
fn unknown_timezone_without_fallback_is_invalid_input() {
    let config = hours("Mars/Olympus_Mons", "08:00", "17:00", 60);

    let err = compute_availability(&config, &[], date(2026, 3, 17)).unwrap_err();

    assert_eq!(err, SlotError::InvalidTimezone("Mars/Olympus_Mons".to_string()));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn unknown_timezone_with_fallback_uses_fixed_offset() {
    let config = hours("Mars/Olympus_Mons", "08:00", "17:00", 60).with_fallback_offset(-300);

    let result = compute_availability(&config, &[], date(2026, 3, 17)).unwrap();

    assert_eq!(result.slots.len(), 9);
    assert_eq!(result.window_start, Utc.with_ymd_and_hms(2026, 3, 17, 13, 0, 0).unwrap());
    assert_eq!(result.timezone, "UTC-05:00");
}

#[test]
fn fallback_is_ignored_for_real_zones() {
    let config = hours("Asia/Kolkata", "09:00", "10:00", 60).with_fallback_offset(0);

    let result = compute_availability(&config, &[], date(2026, 3, 17)).unwrap();

    // IST is UTC+05:30
    assert_eq!(result.window_start, Utc.with_ymd_and_hms(2026, 3, 17, 3, 30, 0).unwrap());
    assert_eq!(result.timezone, "Asia/Kolkata");
}

// ── Target date resolution ──────────────────────────────────────────────────

#[test]
fn default_date_is_local_date_of_now_plus_a_day() {
    let zone = BusinessZone::resolve(CHICAGO, None).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 17, 15, 0, 0).unwrap();

    assert_eq!(resolve_target_date(None, now, &zone).unwrap(), date(2026, 3, 18));
}

#[test]
fn default_date_is_resolved_in_business_timezone() {
    // now + 24h = 2026-03-18T03:00Z, which is still the evening of the 17th in Chicago.
    let zone = BusinessZone::resolve(CHICAGO, None).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 17, 3, 0, 0).unwrap();

    assert_eq!(resolve_target_date(None, now, &zone).unwrap(), date(2026, 3, 17));
    assert_eq!(resolve_target_date(Some("  "), now, &zone).unwrap(), date(2026, 3, 17));
}

#[test]
fn explicit_date_is_parsed() {
    let zone = BusinessZone::resolve("UTC", None).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 17, 3, 0, 0).unwrap();

    assert_eq!(
        resolve_target_date(Some("2026-04-02"), now, &zone).unwrap(),
        date(2026, 4, 2)
    );
}

#[test]
fn malformed_dates_are_invalid_input() {
    let zone = BusinessZone::resolve("UTC", None).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 17, 3, 0, 0).unwrap();

    for raw in ["tomorrow", "2026-13-01", "2026-02-30", "03/17/2026", "2026-03-17T09:00"] {
        let err = resolve_target_date(Some(raw), now, &zone).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "{} should be rejected", raw);
    }
}
