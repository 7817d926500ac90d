//! WASM bindings for slot-engine.
//!
//! Exposes bookable-slot computation to the Node.js calendar bridge via
//! `wasm-bindgen`. All complex types cross the boundary as JSON strings.
//!
//! Domain failures (bad date, unknown timezone, non-positive slot duration) are
//! reported inside the returned response JSON with `success: false`. Only input
//! that cannot be decoded at all (malformed JSON or datetimes) becomes a thrown
//! JavaScript error.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir bridge/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, Utc};
use slot_engine::busy::{overlaps, parse_busy_json, parse_instant};
use slot_engine::calculator::compute_availability;
use slot_engine::{resolve_target_date, AvailabilityResponse, BusinessHoursConfig, BusinessZone};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Native implementations (testable without a JS host)
// ---------------------------------------------------------------------------

/// Compute availability from JSON inputs and return the response as JSON.
///
/// `now` defaults to the current instant and is only used when `date` is absent.
pub fn compute_availability_json(
    config_json: &str,
    busy_json: &str,
    date: Option<&str>,
    now: Option<&str>,
) -> Result<String, String> {
    let config: BusinessHoursConfig = serde_json::from_str(config_json)
        .map_err(|e| format!("Invalid config JSON: {}", e))?;
    let busy = parse_busy_json(busy_json).map_err(|e| e.to_string())?;
    let now: DateTime<Utc> = match now {
        Some(raw) => parse_instant(raw).map_err(|e| e.to_string())?,
        None => Utc::now(),
    };

    let outcome = config
        .validate()
        .and_then(|_| BusinessZone::resolve(&config.timezone, config.fallback_utc_offset_minutes))
        .and_then(|zone| resolve_target_date(date, now, &zone))
        .and_then(|target| compute_availability(&config, &busy, target));

    serde_json::to_string(&AvailabilityResponse::from(outcome))
        .map_err(|e| format!("Serialization error: {}", e))
}

/// Half-open overlap test on four ISO 8601 datetimes.
pub fn slot_overlaps_iso(
    slot_start: &str,
    slot_end: &str,
    busy_start: &str,
    busy_end: &str,
) -> Result<bool, String> {
    let parse = |s: &str| parse_instant(s).map_err(|e| e.to_string());
    Ok(overlaps(
        parse(slot_start)?,
        parse(slot_end)?,
        parse(busy_start)?,
        parse(busy_end)?,
    ))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute the bookable slots for one business day.
///
/// # Arguments
/// - `config_json` -- `{timezone, dayStart, dayEnd, slotDurationMinutes, fallbackUtcOffsetMinutes?}`
///   (snake_case keys are accepted too)
/// - `busy_json` -- JSON array of `{start, end}` ISO 8601 datetimes
/// - `date` -- Optional `YYYY-MM-DD`; defaults to tomorrow in the business timezone
/// - `now` -- Optional ISO 8601 "current instant" used to resolve the default date
///
/// Returns the endpoint response JSON: `{success, status, date, timezone,
/// availableSlots: [{start, startFormatted}], message}`.
#[wasm_bindgen(js_name = "computeAvailability")]
pub fn compute_availability_js(
    config_json: &str,
    busy_json: &str,
    date: Option<String>,
    now: Option<String>,
) -> Result<String, JsValue> {
    compute_availability_json(config_json, busy_json, date.as_deref(), now.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Whether a slot `[slotStart, slotEnd)` overlaps a busy interval `[busyStart, busyEnd)`.
///
/// Touching boundaries do not overlap.
#[wasm_bindgen(js_name = "slotOverlaps")]
pub fn slot_overlaps(
    slot_start: &str,
    slot_end: &str,
    busy_start: &str,
    busy_end: &str,
) -> Result<bool, JsValue> {
    slot_overlaps_iso(slot_start, slot_end, busy_start, busy_end).map_err(|e| JsValue::from_str(&e))
}
