use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::market::SimulationSettings;

/// The four numbers that describe a market run.
///
/// Persisted as a flat JSON object with camelCase keys, e.g.
/// `{"totalTickets":100,"ticketReleaseRate":5,"customerRetrievalRate":4,"maxTicketCapacity":20}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketConfig {
    /// Total tickets to release over the run.
    pub total_tickets: u32,
    /// Number of vendor tasks.
    pub ticket_release_rate: u32,
    /// Number of customer tasks.
    pub customer_retrieval_rate: u32,
    /// Pool capacity.
    pub max_ticket_capacity: u32,
}

impl MarketConfig {
    pub fn new(
        total_tickets: u32,
        ticket_release_rate: u32,
        customer_retrieval_rate: u32,
        max_ticket_capacity: u32,
    ) -> Self {
        Self {
            total_tickets,
            ticket_release_rate,
            customer_retrieval_rate,
            max_ticket_capacity,
        }
    }

    pub fn vendor_count(&self) -> usize {
        self.ticket_release_rate as usize
    }

    pub fn customer_count(&self) -> usize {
        self.customer_retrieval_rate as usize
    }

    pub fn capacity(&self) -> usize {
        self.max_ticket_capacity as usize
    }

    /// Tickets per vendor batch: `total_tickets / ticket_release_rate`.
    /// The remainder is dropped.
    pub fn batch_size(&self) -> usize {
        self.total_tickets
            .checked_div(self.ticket_release_rate)
            .unwrap_or(0) as usize
    }

    /// Tickets each customer collects: `max_ticket_capacity / customer_retrieval_rate`.
    /// The remainder is dropped.
    pub fn customer_quota(&self) -> usize {
        self.max_ticket_capacity
            .checked_div(self.customer_retrieval_rate)
            .unwrap_or(0) as usize
    }
}

/// Root runtime settings, loaded from TOML plus environment overrides.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub simulation: SimulationSettings,
    /// Where the market configuration JSON is saved and loaded.
    #[serde(default = "default_market_config_path")]
    pub market_config_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulation: SimulationSettings::default(),
            market_config_path: default_market_config_path(),
        }
    }
}

fn default_market_config_path() -> PathBuf {
    PathBuf::from("market.json")
}
