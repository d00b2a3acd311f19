//! Vendor task: keeps releasing batches of tickets into the pool.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::metrics;
use crate::pool::TicketPool;

/// What a vendor did before it stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorReport {
    pub vendor_id: usize,
    /// Batches that made it into the pool.
    pub batches_added: u64,
    /// Tickets across those batches.
    pub tickets_added: u64,
}

/// Producer bound to one pool. Runs until cancelled.
#[derive(Debug)]
pub struct Vendor {
    id: usize,
    pool: Arc<TicketPool>,
    batch_size: usize,
    tick: Duration,
}

impl Vendor {
    pub fn new(id: usize, pool: Arc<TicketPool>, batch_size: usize, tick: Duration) -> Self {
        Self {
            id,
            pool,
            batch_size,
            tick,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Add a batch, pause for one tick, repeat.
    ///
    /// Stops when `cancel` fires, whether that happens while waiting for
    /// pool capacity, during the pause, or between iterations.
    pub async fn run(self, cancel: CancellationToken) -> VendorReport {
        let mut report = VendorReport {
            vendor_id: self.id,
            ..Default::default()
        };

        metrics::VENDORS_ACTIVE.inc();
        info!(
            "Vendor {} started (batch size {})",
            self.id, self.batch_size
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            debug!("Vendor {} is adding tickets to the pool", self.id);
            if self.pool.add_tickets(self.batch_size, &cancel).await.is_err() {
                debug!("Vendor {} cancelled while waiting for capacity", self.id);
                break;
            }
            report.batches_added += 1;
            report.tickets_added += self.batch_size as u64;
            metrics::BATCHES_ADDED.inc();

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.tick) => {}
            }
        }

        metrics::VENDORS_ACTIVE.dec();
        info!(
            "Vendor {} stopped after {} batches ({} tickets)",
            self.id, report.batches_added, report.tickets_added
        );
        report
    }
}
