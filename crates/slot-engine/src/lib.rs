//! # slot-engine
//!
//! Deterministic, DST-aware bookable-slot computation for multi-tenant calendar
//! agents.
//!
//! Given a tenant's business hours, timezone and appointment length plus the
//! busy intervals reported by their calendar, the engine returns the slots that
//! can be booked on a day without double-booking. Offsets are resolved per date
//! from the IANA database via `chrono-tz`.
//!
//! ## Modules
//!
//! - [`calculator`] — business day → candidate slots → available slots
//! - [`hours`] — per-tenant business-hours configuration
//! - [`timezone`] — zone resolution, DST boundary policies, local formatting
//! - [`busy`] — busy intervals and the half-open overlap test
//! - [`service`] — client store / busy provider seams and the availability flow
//! - [`response`] — JSON contract of the availability endpoint
//! - [`error`] — Error types

pub mod busy;
pub mod calculator;
pub mod error;
pub mod hours;
pub mod response;
pub mod service;
pub mod timezone;

pub use busy::BusyInterval;
pub use calculator::{compute_availability, resolve_target_date, AvailabilityResult, AvailableSlot};
pub use error::{ErrorKind, SlotError};
pub use hours::{BusinessHoursConfig, LocalTime};
pub use response::AvailabilityResponse;
pub use service::AvailabilityService;
pub use timezone::{BusinessZone, DstPolicy};
