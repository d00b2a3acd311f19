//! Types for the marketplace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::customer::CustomerReport;
use super::vendor::VendorReport;
use crate::config::ConfigError;
use crate::pool::PoolStatus;

/// Errors that can occur while driving a market run.
#[derive(Debug, Error)]
pub enum MarketError {
    /// Configuration rejected before any task was spawned.
    #[error("invalid market configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// `start` called on a running market.
    #[error("market is already running")]
    AlreadyRunning,

    /// `start` called after `stop`.
    #[error("market has already been stopped")]
    AlreadyStopped,
}

/// Current status of the marketplace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketStatus {
    /// Whether vendor and customer tasks have been started and not stopped.
    pub running: bool,
    /// When the market was started.
    pub started_at: Option<DateTime<Utc>>,
    /// Tickets per vendor batch.
    pub batch_size: usize,
    /// Tickets each customer is after.
    pub customer_quota: usize,
    /// Vendor tasks still running.
    pub vendors_active: usize,
    /// Customer tasks still running.
    pub customers_active: usize,
    /// Pool snapshot.
    pub pool: PoolStatus,
}

/// Everything gathered from a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: DateTime<Utc>,
    pub vendors: Vec<VendorReport>,
    pub customers: Vec<CustomerReport>,
    pub pool: PoolStatus,
}

impl RunSummary {
    /// Tickets collected across all customers.
    pub fn tickets_sold(&self) -> usize {
        self.customers.iter().map(|c| c.tickets.len()).sum()
    }

    /// Tickets released across all vendors.
    pub fn tickets_released(&self) -> u64 {
        self.vendors.iter().map(|v| v.tickets_added).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_status_default() {
        let status = MarketStatus::default();
        assert!(!status.running);
        assert!(status.started_at.is_none());
        assert_eq!(status.vendors_active, 0);
        assert_eq!(status.customers_active, 0);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            MarketError::AlreadyRunning.to_string(),
            "market is already running"
        );

        let err = MarketError::from(ConfigError::ValidationError(
            "maxTicketCapacity cannot exceed totalTickets".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "invalid market configuration: Configuration validation failed: maxTicketCapacity cannot exceed totalTickets"
        );
    }

    #[test]
    fn test_run_summary_totals() {
        let summary = RunSummary {
            started_at: Some(Utc::now()),
            stopped_at: Utc::now(),
            vendors: vec![
                VendorReport {
                    vendor_id: 1,
                    batches_added: 2,
                    tickets_added: 6,
                },
                VendorReport {
                    vendor_id: 2,
                    batches_added: 1,
                    tickets_added: 3,
                },
            ],
            customers: vec![CustomerReport {
                customer_id: 1,
                quota: 4,
                tickets: Vec::new(),
                completed: false,
            }],
            pool: PoolStatus::default(),
        };

        assert_eq!(summary.tickets_released(), 9);
        assert_eq!(summary.tickets_sold(), 0);

        let json = serde_json::to_string(&summary).unwrap();
        let parsed: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.vendors.len(), 2);
    }
}
