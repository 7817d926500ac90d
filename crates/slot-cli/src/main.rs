//! `slots` CLI — compute tenant availability and validate client files.
//!
//! ## Usage
//!
//! ```sh
//! # Tomorrow's slots for a tenant, busy intervals on stdin
//! echo '[{"start":"2026-03-17T14:00:00Z","end":"2026-03-17T15:00:00Z"}]' \
//!   | slots available --clients clients.toml --tenant acme-dental
//!
//! # A specific date, busy intervals from a file, response written to a file
//! slots available --clients clients.toml --tenant acme-dental \
//!   --date 2026-03-17 --busy busy.json -o slots.json
//!
//! # Validate every tenant in a client file
//! slots check --clients clients.toml
//! ```
//!
//! `available` exits 0 when the response is a success (including "no openings")
//! and 2 when it reports a failure; the response JSON is printed either way.

mod config;
mod logging;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use slot_engine::busy::{parse_busy_json, parse_instant};
use slot_engine::service::StaticBusyProvider;
use slot_engine::AvailabilityService;
use tracing::{debug, info};

use crate::config::ClientFile;

/// Exit status when the availability response reports a failure.
const EXIT_UNAVAILABLE: i32 = 2;

#[derive(Parser)]
#[command(name = "slots", version, about = "Bookable-slot calculator for calendar tenants")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a tenant's available slots for one day
    Available {
        /// Client file (TOML)
        #[arg(short, long)]
        clients: PathBuf,
        /// Tenant id to compute availability for
        #[arg(short, long)]
        tenant: String,
        /// Busy intervals JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        busy: Option<PathBuf>,
        /// Target date, YYYY-MM-DD (defaults to tomorrow in the tenant's timezone)
        #[arg(short, long)]
        date: Option<String>,
        /// Current instant, RFC 3339 (defaults to the system clock)
        #[arg(long)]
        now: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate every tenant in a client file
    Check {
        /// Client file (TOML)
        #[arg(short, long)]
        clients: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Available {
            clients,
            tenant,
            busy,
            date,
            now,
            output,
        } => {
            let file = ClientFile::load(&clients)?;
            logging::init(&file.logging, cli.verbose)?;

            let calendar_id = file
                .profile(&tenant)?
                .map(|c| c.calendar_id.clone())
                .unwrap_or_default();
            let store = file.store();

            let busy_json = read_busy(busy.as_deref())?;
            let intervals = if busy_json.trim().is_empty() {
                Vec::new()
            } else {
                parse_busy_json(&busy_json).context("Failed to parse busy intervals")?
            };
            debug!(count = intervals.len(), "loaded busy intervals");

            let now: DateTime<Utc> = match now.as_deref() {
                Some(raw) => parse_instant(raw).context("Invalid --now")?,
                None => Utc::now(),
            };

            let provider = StaticBusyProvider::new().with_calendar(calendar_id, intervals);
            let service = AvailabilityService::new(store, provider);
            let response = service.check(&tenant, date.as_deref(), now);

            let pretty = serde_json::to_string_pretty(&response)?;
            write_output(output.as_deref(), &pretty)?;

            if !response.is_ok() {
                process::exit(EXIT_UNAVAILABLE);
            }
        }
        Commands::Check { clients } => {
            let file = ClientFile::load(&clients)?;
            logging::init(&file.logging, cli.verbose)?;

            let checks = file.check();
            let mut failures = 0;
            for check in &checks {
                let profile = check.profile;
                let hours = &profile.business_hours;
                match (&check.zone, check.duplicate) {
                    (_, true) => {
                        failures += 1;
                        println!("error  {}  duplicate tenant id", profile.tenant_id);
                    }
                    (Ok(zone), false) => {
                        let note = if zone.is_fallback() { " (fallback offset)" } else { "" };
                        println!(
                            "ok     {}  {}{}  {}-{}  {} min",
                            profile.tenant_id,
                            zone,
                            note,
                            hours.day_start,
                            hours.day_end,
                            hours.slot_duration_minutes
                        );
                    }
                    (Err(e), false) => {
                        failures += 1;
                        println!("error  {}  {} ({})", profile.tenant_id, e, e.kind().as_str());
                    }
                }
            }
            info!(clients = checks.len(), failures, "client file checked");

            if failures > 0 {
                anyhow::bail!("{} of {} clients are invalid", failures, checks.len());
            }
        }
    }

    Ok(())
}

fn read_busy(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut stdin = io::stdin();
            if stdin.is_terminal() {
                return Ok(String::new());
            }
            let mut buf = String::new();
            stdin
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
