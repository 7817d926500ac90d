//! Error types for slot-engine operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid slot duration: {0} minutes (must be greater than zero)")]
    InvalidSlotDuration(i64),

    #[error("Invalid business hours: {0}")]
    InvalidBusinessHours(String),

    #[error("Unknown tenant: {0}")]
    UnknownTenant(String),

    #[error("Upstream unavailable: {0}")]
    Upstream(String),
}

/// Failure reported by a collaborator (client store or busy-query provider).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("tenant not found: {0}")]
    UnknownTenant(String),

    #[error("{0}")]
    Unavailable(String),
}

impl From<ProviderError> for SlotError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::UnknownTenant(id) => SlotError::UnknownTenant(id),
            ProviderError::Unavailable(reason) => SlotError::Upstream(reason),
        }
    }
}

/// Failure category reported to callers of the availability endpoint.
///
/// Serialized in `snake_case`; this is the `status` field of a failed
/// [`AvailabilityResponse`](crate::response::AvailabilityResponse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad target date, unresolvable timezone or unknown tenant.
    InvalidInput,
    /// Non-positive slot duration or unordered business hours.
    InvalidConfiguration,
    /// The busy-interval provider or the client store failed.
    UpstreamUnavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InvalidConfiguration => "invalid_configuration",
            ErrorKind::UpstreamUnavailable => "upstream_unavailable",
        }
    }
}

impl SlotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SlotError::InvalidDate(_)
            | SlotError::InvalidTimezone(_)
            | SlotError::UnknownTenant(_) => ErrorKind::InvalidInput,
            SlotError::InvalidSlotDuration(_) | SlotError::InvalidBusinessHours(_) => {
                ErrorKind::InvalidConfiguration
            }
            SlotError::Upstream(_) => ErrorKind::UpstreamUnavailable,
        }
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
