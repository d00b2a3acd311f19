//! Customer task: withdraws a fixed quota of tickets from the pool.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::metrics;
use crate::pool::{Ticket, TicketPool};

/// Outcome of a customer run, including every ticket it collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerReport {
    pub customer_id: usize,
    /// Tickets the customer set out to collect.
    pub quota: usize,
    /// Collected tickets in the order they were withdrawn.
    pub tickets: Vec<Ticket>,
    /// True when the full quota was collected.
    pub completed: bool,
}

impl CustomerReport {
    pub fn labels(&self) -> Vec<String> {
        self.tickets.iter().map(Ticket::label).collect()
    }
}

/// Consumer bound to one pool.
#[derive(Debug)]
pub struct Customer {
    id: usize,
    pool: Arc<TicketPool>,
    quota: usize,
    tick: Duration,
}

impl Customer {
    pub fn new(id: usize, pool: Arc<TicketPool>, quota: usize, tick: Duration) -> Self {
        Self {
            id,
            pool,
            quota,
            tick,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Withdraw `quota` tickets one at a time, pausing one tick after each.
    ///
    /// If the pool is empty on entry the customer first waits for a vendor
    /// to stock it. Cancellation ends the run early; tickets already
    /// withdrawn are kept in the report.
    pub async fn run(self, cancel: CancellationToken) -> CustomerReport {
        let mut report = CustomerReport {
            customer_id: self.id,
            quota: self.quota,
            tickets: Vec::with_capacity(self.quota),
            completed: false,
        };

        metrics::CUSTOMERS_ACTIVE.inc();
        info!("Customer {} started (quota {})", self.id, self.quota);

        if self.pool.is_empty().await {
            info!(
                "Customer {}: ticket pool is empty, waiting for vendors to load tickets",
                self.id
            );
            if !self.pool.wait_until_not_empty(&cancel).await {
                info!("Customer {} cancelled while waiting for tickets", self.id);
                return self.finish(report);
            }
        }

        for _ in 0..self.quota {
            if cancel.is_cancelled() {
                info!("Customer {} cancelled during ticket extraction", self.id);
                break;
            }

            match self.pool.remove_ticket(&cancel).await {
                Some(ticket) => {
                    debug!("Customer {} received {}", self.id, ticket);
                    report.tickets.push(ticket);
                }
                None => {
                    info!("Customer {} cancelled while waiting for a ticket", self.id);
                    break;
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.tick) => {}
            }
        }

        report.completed = report.tickets.len() == self.quota;
        if report.completed {
            metrics::CUSTOMERS_COMPLETED.inc();
            info!(
                "Customer {} extracted all {} tickets from the pool",
                self.id, self.quota
            );
            self.pool.notify_all();
        }

        self.finish(report)
    }

    fn finish(&self, report: CustomerReport) -> CustomerReport {
        metrics::CUSTOMERS_ACTIVE.dec();
        info!(
            "Customer {} stopped with {}/{} tickets",
            self.id,
            report.tickets.len(),
            self.quota
        );
        report
    }
}
