//! Client file: the tenants the CLI can answer for, plus logging settings.
//!
//! ```toml
//! [logging]
//! level = "info"        # overridden by RUST_LOG
//! format = "compact"    # or "json"
//!
//! [[clients]]
//! tenant_id = "acme-dental"
//! calendar_id = "acme@group.calendar.google.com"
//! timezone = "America/Chicago"
//! day_start = "08:00"
//! day_end = "17:00"
//! slot_duration_minutes = 60
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use slot_engine::service::{ClientProfile, InMemoryClientStore};
use slot_engine::{BusinessZone, SlotError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientFile {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub clients: Vec<ClientProfile>,
}

/// Outcome of validating one `[[clients]]` entry.
#[derive(Debug)]
pub struct ClientCheck<'a> {
    pub profile: &'a ClientProfile,
    pub zone: Result<BusinessZone, SlotError>,
    pub duplicate: bool,
}

impl ClientFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read client file: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid client file: {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Validate every entry: hours, duration, timezone, unique tenant ids.
    pub fn check(&self) -> Vec<ClientCheck<'_>> {
        let mut seen = HashSet::new();
        self.clients
            .iter()
            .map(|profile| {
                let hours = &profile.business_hours;
                let zone = hours.validate().and_then(|_| {
                    BusinessZone::resolve(&hours.timezone, hours.fallback_utc_offset_minutes)
                });
                ClientCheck {
                    profile,
                    zone,
                    duplicate: !seen.insert(profile.tenant_id.as_str()),
                }
            })
            .collect()
    }

    /// The single entry for `tenant_id`, if any.
    ///
    /// # Errors
    /// Fails when the tenant id is listed more than once, since the entries
    /// may point at different calendars.
    pub fn profile(&self, tenant_id: &str) -> Result<Option<&ClientProfile>> {
        let mut matches = self.clients.iter().filter(|c| c.tenant_id == tenant_id);
        let first = matches.next();
        let extra = matches.count();
        if extra > 0 {
            anyhow::bail!(
                "tenant id '{}' appears {} times in the client file (run `slots check`)",
                tenant_id,
                extra + 1
            );
        }
        Ok(first)
    }

    pub fn store(&self) -> InMemoryClientStore {
        self.clients.iter().cloned().collect()
    }
}
