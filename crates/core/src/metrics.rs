//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ticket pool (tickets added/removed, current size, waits)
//! - Vendor and customer tasks (batches, active tasks)

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntGauge};

// =============================================================================
// Ticket Pool Metrics
// =============================================================================

/// Tickets added to the pool total.
pub static TICKETS_ADDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ticketmarket_tickets_added_total",
        "Total tickets added to the pool",
    )
    .unwrap()
});

/// Tickets removed from the pool total.
pub static TICKETS_REMOVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ticketmarket_tickets_removed_total",
        "Total tickets removed from the pool",
    )
    .unwrap()
});

/// Current number of tickets in the pool.
pub static POOL_SIZE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("ticketmarket_pool_size", "Tickets currently in the pool").unwrap()
});

/// Times a vendor had to wait for free capacity.
pub static PRODUCER_WAITS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ticketmarket_producer_waits_total",
        "Total add calls that had to wait for free capacity",
    )
    .unwrap()
});

/// Times a customer had to wait for a ticket.
pub static CONSUMER_WAITS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ticketmarket_consumer_waits_total",
        "Total remove calls that had to wait for a ticket",
    )
    .unwrap()
});

// =============================================================================
// Task Metrics
// =============================================================================

/// Batches added by vendors total.
pub static BATCHES_ADDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ticketmarket_batches_added_total",
        "Total ticket batches added by vendors",
    )
    .unwrap()
});

/// Vendor tasks currently running.
pub static VENDORS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("ticketmarket_vendors_active", "Vendor tasks currently running").unwrap()
});

/// Customer tasks currently running.
pub static CUSTOMERS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "ticketmarket_customers_active",
        "Customer tasks currently running",
    )
    .unwrap()
});

/// Customers that met their quota.
pub static CUSTOMERS_COMPLETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ticketmarket_customers_completed_total",
        "Total customers that collected their full quota",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Pool
        Box::new(TICKETS_ADDED.clone()),
        Box::new(TICKETS_REMOVED.clone()),
        Box::new(POOL_SIZE.clone()),
        Box::new(PRODUCER_WAITS.clone()),
        Box::new(CONSUMER_WAITS.clone()),
        // Tasks
        Box::new(BATCHES_ADDED.clone()),
        Box::new(VENDORS_ACTIVE.clone()),
        Box::new(CUSTOMERS_ACTIVE.clone()),
        Box::new(CUSTOMERS_COMPLETED.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"ticketmarket_tickets_added_total".to_string()));
        assert!(names.contains(&"ticketmarket_pool_size".to_string()));
    }
}
