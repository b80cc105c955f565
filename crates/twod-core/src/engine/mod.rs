//! Reconciliation engine
//!
//! The ReconciliationEngine is responsible for:
//! - Discovering the current public IP via an [`IpDiscoverer`]
//! - Comparing it with the last IP the host-record service confirmed
//! - Submitting an update through a [`HostRecordService`] when they differ
//! - Remembering the new IP only once the service accepted it
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   PollLoop   │── every `interval` ──┐
//! └──────────────┘                      │
//!                                       ▼
//!                          ┌───────────────────────┐
//!                          │ ReconciliationEngine  │
//!                          │  (last-known IP)      │
//!                          └───────────────────────┘
//!                               │               │
//!                               ▼               ▼
//!                      ┌──────────────┐  ┌───────────────────┐
//!                      │ IpDiscoverer │  │ HostRecordService │
//!                      │  (discover)  │  │ (fetch / update)  │
//!                      └──────────────┘  └───────────────────┘
//! ```
//!
//! ## Cycle
//!
//! | discovery | vs last-known | action            | last-known after |
//! |-----------|---------------|-------------------|------------------|
//! | failed    | -             | none              | unchanged        |
//! | ip        | equal         | none              | unchanged        |
//! | ip        | different     | update succeeds   | ip               |
//! | ip        | different     | update fails      | unchanged        |
//!
//! The recorded IP is fetched once, when the engine is built. A failed
//! update is never assumed to have taken effect, so the next cycle compares
//! against the old value and tries again.

mod poll;

pub use poll::PollLoop;

use crate::error::Operation;
use crate::traits::{HostRecordService, IpDiscoverer};
use tracing::{debug, info};

/// Which branch of the cycle was taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Discovery failed; nothing was compared
    DiscoveryFailed,

    /// The discovered IP matches the last-known IP
    Unchanged { ip: String },

    /// The host record now holds `new_ip`
    Updated {
        previous_ip: Option<String>,
        new_ip: String,
    },

    /// The update was rejected or never confirmed
    UpdateFailed { new_ip: String },
}

/// Core reconciliation engine
///
/// Owns the last-known IP exclusively. Nothing outside the engine can change
/// it, and the engine itself only changes it after a confirmed update.
pub struct ReconciliationEngine {
    /// Source of the current public IP
    discoverer: Box<dyn IpDiscoverer>,

    /// The DNS provider holding the host record
    host_record: Box<dyn HostRecordService>,

    /// IP the host-record service is believed to store
    last_known_ip: Option<String>,
}

impl ReconciliationEngine {
    /// Create an engine seeded with the currently recorded IP
    ///
    /// If the recorded IP cannot be fetched the engine starts without one,
    /// and the first successful discovery triggers an update.
    pub async fn new(
        discoverer: Box<dyn IpDiscoverer>,
        host_record: Box<dyn HostRecordService>,
    ) -> Self {
        debug!("Fetching TwoDNS IP...");
        let last_known_ip = match host_record.fetch_recorded().await {
            Ok(ip) => {
                info!("TwoDNS currently records {}", ip);
                Some(ip)
            }
            Err(e) => {
                e.report(Operation::FetchRecordedIp);
                None
            }
        };

        Self::with_last_known_ip(discoverer, host_record, last_known_ip)
    }

    /// Create an engine with an explicit starting value and no initial fetch
    pub fn with_last_known_ip(
        discoverer: Box<dyn IpDiscoverer>,
        host_record: Box<dyn HostRecordService>,
        last_known_ip: Option<String>,
    ) -> Self {
        Self {
            discoverer,
            host_record,
            last_known_ip,
        }
    }

    /// The IP the host-record service is believed to store
    pub fn last_known_ip(&self) -> Option<&str> {
        self.last_known_ip.as_deref()
    }

    /// Run one discover → compare → update cycle
    ///
    /// Never fails: every error is logged where it is absorbed.
    pub async fn cycle(&mut self) -> CycleOutcome {
        debug!("Checking if recorded IP matches current IP...");

        let external_ip = match self.discoverer.discover().await {
            Ok(ip) => ip,
            Err(e) => {
                e.report(Operation::DiscoverExternalIp);
                return CycleOutcome::DiscoveryFailed;
            }
        };

        if self.last_known_ip.as_deref() == Some(external_ip.as_str()) {
            debug!("IP has not changed.");
            return CycleOutcome::Unchanged { ip: external_ip };
        }

        debug!(
            "Updating recorded IP: {} -> {}",
            self.last_known_ip.as_deref().unwrap_or("<unknown>"),
            external_ip
        );

        match self.host_record.update(&external_ip).await {
            Ok(()) => {
                let previous_ip = self.last_known_ip.replace(external_ip.clone());
                CycleOutcome::Updated {
                    previous_ip,
                    new_ip: external_ip,
                }
            }
            Err(e) => {
                e.report(Operation::UpdateRecordedIp);
                CycleOutcome::UpdateFailed { new_ip: external_ip }
            }
        }
    }
}
