//! JSON contract of the "check availability" endpoint.
//!
//! Field names are camelCase to match what the calling agent already consumes:
//! `success`, `status`, `date`, `timezone`, `availableSlots[]` (`start`,
//! `startFormatted`) and `message`. A failure always carries `success: false`
//! and a non-`ok` status, so "no openings" is never confused with a bad request.

use serde::{Deserialize, Serialize};

use crate::calculator::{AvailabilityResult, AvailableSlot};
use crate::error::SlotError;

/// Status of a successful response.
pub const STATUS_OK: &str = "ok";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDto {
    /// RFC 3339 instant in UTC.
    pub start: String,
    /// Local wall-clock rendering, e.g. "Tuesday, March 17 at 9:00 AM".
    pub start_formatted: String,
}

impl From<&AvailableSlot> for SlotDto {
    fn from(slot: &AvailableSlot) -> Self {
        Self {
            start: slot.start.to_rfc3339(),
            start_formatted: slot.start_formatted.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub success: bool,
    /// `"ok"` or an [`ErrorKind`](crate::error::ErrorKind) in snake_case.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub available_slots: Vec<SlotDto>,
    pub message: String,
}

impl AvailabilityResponse {
    pub fn from_result(result: &AvailabilityResult) -> Self {
        let date = result.date.format("%Y-%m-%d").to_string();
        let message = match result.slots.len() {
            0 => format!("No available slots on {}", date),
            1 => format!("1 available slot on {}", date),
            n => format!("{} available slots on {}", n, date),
        };

        Self {
            success: true,
            status: STATUS_OK.to_string(),
            date: Some(date),
            timezone: Some(result.timezone.clone()),
            available_slots: result.slots.iter().map(SlotDto::from).collect(),
            message,
        }
    }

    pub fn from_error(error: &SlotError) -> Self {
        Self {
            success: false,
            status: error.kind().as_str().to_string(),
            date: None,
            timezone: None,
            available_slots: Vec::new(),
            message: error.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.success
    }
}

impl From<Result<AvailabilityResult, SlotError>> for AvailabilityResponse {
    fn from(outcome: Result<AvailabilityResult, SlotError>) -> Self {
        match outcome {
            Ok(result) => Self::from_result(&result),
            Err(e) => Self::from_error(&e),
        }
    }
}
