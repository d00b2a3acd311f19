//! Ticket pool implementation.
//!
//! A single mutex guards the queue and counters. A single [`Notify`] is used
//! as a broadcast condition: every add or remove wakes all waiters, and each
//! waiter re-checks its own predicate before proceeding. Waiters register
//! for the next notification *before* inspecting the state, so a change that
//! happens between the check and the wait is never missed.

use std::collections::VecDeque;

use tokio::sync::{Mutex, Notify};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::types::{PoolError, PoolStatus, Ticket};
use crate::metrics;

/// State guarded by the pool lock.
#[derive(Debug)]
struct PoolState {
    queue: VecDeque<Ticket>,
    next_sequence: u64,
    peak_size: usize,
    total_added: u64,
    total_removed: u64,
}

impl PoolState {
    fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            next_sequence: 1,
            peak_size: 0,
            total_added: 0,
            total_removed: 0,
        }
    }

    fn mint(&mut self) -> Ticket {
        let ticket = Ticket::new(self.next_sequence);
        self.next_sequence += 1;
        ticket
    }
}

/// Bounded FIFO pool of tickets.
///
/// Shared between tasks behind an `Arc`. All operations are atomic with
/// respect to each other: a batch is either fully visible or not at all.
#[derive(Debug)]
pub struct TicketPool {
    capacity: usize,
    state: Mutex<PoolState>,
    changed: Notify,
}

impl TicketPool {
    /// Create an empty pool holding at most `capacity` tickets.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(PoolState::new(capacity)),
            changed: Notify::new(),
        }
    }

    /// Maximum number of tickets the pool holds at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add `count` freshly minted tickets to the tail of the pool.
    ///
    /// Waits while `size + count > capacity`. When `cancel` fires during the
    /// wait, returns [`PoolError::Cancelled`] without adding anything.
    ///
    /// A batch larger than the capacity can never fit, so such a call only
    /// returns once cancelled.
    pub async fn add_tickets(
        &self,
        count: usize,
        cancel: &CancellationToken,
    ) -> Result<(), PoolError> {
        if count == 0 {
            return Ok(());
        }

        if count > self.capacity {
            warn!(
                "Batch of {} tickets exceeds pool capacity {}; the call will block until cancelled",
                count, self.capacity
            );
        }

        let mut waiting = false;
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state.lock().await;
                if state.queue.len() + count <= self.capacity {
                    for _ in 0..count {
                        let ticket = state.mint();
                        state.queue.push_back(ticket);
                    }
                    state.total_added += count as u64;
                    state.peak_size = state.peak_size.max(state.queue.len());

                    metrics::TICKETS_ADDED.inc_by(count as u64);
                    metrics::POOL_SIZE.set(state.queue.len() as i64);
                    debug!(
                        "Tickets ({}) added to ticket pool, size now {}/{}",
                        count,
                        state.queue.len(),
                        self.capacity
                    );

                    drop(state);
                    self.changed.notify_waiters();
                    return Ok(());
                }

                if !waiting {
                    waiting = true;
                    metrics::PRODUCER_WAITS.inc();
                    debug!(
                        "Cannot add {} tickets beyond maximum capacity {} (size {})",
                        count,
                        self.capacity,
                        state.queue.len()
                    );
                }
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = cancel.cancelled() => {
                    debug!("Add of {} tickets cancelled while waiting for space", count);
                    return Err(PoolError::Cancelled);
                }
            }
        }
    }

    /// Remove the oldest ticket from the pool.
    ///
    /// Waits while the pool is empty. Returns `None` when `cancel` fires
    /// before a ticket becomes available.
    pub async fn remove_ticket(&self, cancel: &CancellationToken) -> Option<Ticket> {
        let mut waiting = false;
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state.lock().await;
                if let Some(ticket) = state.queue.pop_front() {
                    state.total_removed += 1;

                    metrics::TICKETS_REMOVED.inc();
                    metrics::POOL_SIZE.set(state.queue.len() as i64);
                    debug!("{} retrieved from the pool", ticket);

                    drop(state);
                    self.changed.notify_waiters();
                    return Some(ticket);
                }

                if !waiting {
                    waiting = true;
                    metrics::CONSUMER_WAITS.inc();
                    debug!("Ticket pool is empty, waiting for a vendor to add tickets");
                }
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = cancel.cancelled() => {
                    debug!("Ticket removal cancelled while pool was empty");
                    return None;
                }
            }
        }
    }

    /// Wait until the pool holds at least one ticket.
    ///
    /// Returns `false` if `cancel` fired first. Does not take a ticket.
    pub async fn wait_until_not_empty(&self, cancel: &CancellationToken) -> bool {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if !self.state.lock().await.queue.is_empty() {
                return true;
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = cancel.cancelled() => return false,
            }
        }
    }

    /// Wake every task waiting on the pool so it re-checks its condition.
    pub fn notify_all(&self) {
        self.changed.notify_waiters();
    }

    /// Number of tickets currently in the pool.
    pub async fn len(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.queue.is_empty()
    }

    /// Snapshot of sizes and counters.
    pub async fn status(&self) -> PoolStatus {
        let state = self.state.lock().await;
        PoolStatus {
            capacity: self.capacity,
            size: state.queue.len(),
            peak_size: state.peak_size,
            issued: state.next_sequence - 1,
            total_added: state.total_added,
            total_removed: state.total_removed,
        }
    }
}
