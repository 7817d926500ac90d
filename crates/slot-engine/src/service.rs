//! Collaborator seams and the "check availability" flow built on them.
//!
//! The calculator never touches the network or credentials. The service asks a
//! [`ClientConfigStore`] for the tenant's profile, asks a [`BusyQueryProvider`]
//! for the busy intervals inside that tenant's business day, and hands both to
//! the calculator. Neither collaborator is retried here.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::busy::BusyInterval;
use crate::calculator::{
    availability_in_window, business_day_window, resolve_target_date, AvailabilityResult,
};
use crate::error::{ProviderError, Result};
use crate::hours::BusinessHoursConfig;
use crate::response::AvailabilityResponse;
use crate::timezone::{BusinessZone, DstPolicy};

/// What the configuration store knows about one tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub tenant_id: String,
    /// Calendar whose busy intervals gate this tenant's bookings.
    pub calendar_id: String,
    #[serde(flatten)]
    pub business_hours: BusinessHoursConfig,
}

/// Supplies per-tenant configuration.
pub trait ClientConfigStore: Send + Sync {
    fn client(&self, tenant_id: &str) -> std::result::Result<ClientProfile, ProviderError>;
}

/// Answers free/busy queries for a calendar.
///
/// Implementations own their timeouts; a slow upstream should surface as
/// `ProviderError::Unavailable`.
pub trait BusyQueryProvider: Send + Sync {
    fn query_busy(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> std::result::Result<Vec<BusyInterval>, ProviderError>;
}

impl<T: ClientConfigStore + ?Sized> ClientConfigStore for &T {
    fn client(&self, tenant_id: &str) -> std::result::Result<ClientProfile, ProviderError> {
        (**self).client(tenant_id)
    }
}

impl<T: ClientConfigStore + ?Sized> ClientConfigStore for Arc<T> {
    fn client(&self, tenant_id: &str) -> std::result::Result<ClientProfile, ProviderError> {
        (**self).client(tenant_id)
    }
}

impl<T: BusyQueryProvider + ?Sized> BusyQueryProvider for &T {
    fn query_busy(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> std::result::Result<Vec<BusyInterval>, ProviderError> {
        (**self).query_busy(calendar_id, window_start, window_end)
    }
}

impl<T: BusyQueryProvider + ?Sized> BusyQueryProvider for Arc<T> {
    fn query_busy(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> std::result::Result<Vec<BusyInterval>, ProviderError> {
        (**self).query_busy(calendar_id, window_start, window_end)
    }
}

/// Client profiles held in memory, keyed by tenant id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClientStore {
    clients: HashMap<String, ClientProfile>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, profile: ClientProfile) {
        self.clients.insert(profile.tenant_id.clone(), profile);
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl FromIterator<ClientProfile> for InMemoryClientStore {
    fn from_iter<I: IntoIterator<Item = ClientProfile>>(iter: I) -> Self {
        let mut store = Self::new();
        for profile in iter {
            store.insert(profile);
        }
        store
    }
}

impl ClientConfigStore for InMemoryClientStore {
    fn client(&self, tenant_id: &str) -> std::result::Result<ClientProfile, ProviderError> {
        self.clients
            .get(tenant_id)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownTenant(tenant_id.to_string()))
    }
}

/// Fixed busy intervals per calendar. Unknown calendars are entirely free.
#[derive(Debug, Clone, Default)]
pub struct StaticBusyProvider {
    calendars: HashMap<String, Vec<BusyInterval>>,
}

impl StaticBusyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calendar(mut self, calendar_id: impl Into<String>, busy: Vec<BusyInterval>) -> Self {
        self.calendars.insert(calendar_id.into(), busy);
        self
    }
}

impl BusyQueryProvider for StaticBusyProvider {
    fn query_busy(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> std::result::Result<Vec<BusyInterval>, ProviderError> {
        Ok(self
            .calendars
            .get(calendar_id)
            .map(|busy| {
                busy.iter()
                    .filter(|b| b.overlaps(window_start, window_end))
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// The "check availability" operation over a store and a busy provider.
#[derive(Debug, Clone)]
pub struct AvailabilityService<S, P> {
    store: S,
    provider: P,
    policy: DstPolicy,
}

impl<S: ClientConfigStore, P: BusyQueryProvider> AvailabilityService<S, P> {
    pub fn new(store: S, provider: P) -> Self {
        Self {
            store,
            provider,
            policy: DstPolicy::default(),
        }
    }

    pub fn with_dst_policy(mut self, policy: DstPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Compute a tenant's availability for `raw_date` (or tomorrow when absent).
    ///
    /// `now` is only used to resolve the default date.
    ///
    /// # Errors
    /// Store and provider failures map to `UnknownTenant` / `Upstream`; everything
    /// else is whatever the calculator reports.
    pub fn availability(
        &self,
        tenant_id: &str,
        raw_date: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AvailabilityResult> {
        let profile = self.store.client(tenant_id)?;
        let config = &profile.business_hours;
        config.validate()?;

        let zone = BusinessZone::resolve(&config.timezone, config.fallback_utc_offset_minutes)?;
        let date = resolve_target_date(raw_date, now, &zone)?;
        let (window_start, window_end) = business_day_window(config, &zone, date, self.policy)?;

        let busy = self
            .provider
            .query_busy(&profile.calendar_id, window_start, window_end)
            .map_err(|e| match e {
                // Busy lookups are keyed by calendar, so any failure is an outage.
                ProviderError::UnknownTenant(id) => {
                    ProviderError::Unavailable(format!("calendar lookup failed for {}", id))
                }
                other => other,
            })?;

        availability_in_window(config, &zone, &busy, date, (window_start, window_end))
    }

    /// [`availability`](Self::availability) rendered as the endpoint response.
    pub fn check(
        &self,
        tenant_id: &str,
        raw_date: Option<&str>,
        now: DateTime<Utc>,
    ) -> AvailabilityResponse {
        match self.availability(tenant_id, raw_date, now) {
            Ok(result) => {
                info!(
                    tenant = tenant_id,
                    date = %result.date,
                    slots = result.slots.len(),
                    "availability computed"
                );
                AvailabilityResponse::from_result(&result)
            }
            Err(e) => {
                warn!(
                    tenant = tenant_id,
                    status = e.kind().as_str(),
                    error = %e,
                    "availability check failed"
                );
                AvailabilityResponse::from_error(&e)
            }
        }
    }
}
