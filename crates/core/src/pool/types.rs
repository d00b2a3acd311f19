//! Types for the ticket pool.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single ticket minted by the pool.
///
/// Tickets are interchangeable apart from their sequence number, which is
/// assigned once at creation and never reused for the lifetime of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticket {
    sequence: u64,
}

impl Ticket {
    pub(crate) fn new(sequence: u64) -> Self {
        Self { sequence }
    }

    /// Sequence number, starting at 1.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Human readable label, e.g. `Ticket no.7`.
    pub fn label(&self) -> String {
        format!("Ticket no.{}", self.sequence)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ticket no.{}", self.sequence)
    }
}

/// Errors returned by pool operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// The caller's cancellation token fired while it was waiting.
    /// Nothing was added to the pool.
    #[error("pool operation cancelled")]
    Cancelled,
}

/// Point-in-time view of the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Maximum number of tickets held at once.
    pub capacity: usize,
    /// Tickets currently in the pool.
    pub size: usize,
    /// Highest size ever observed after an add.
    pub peak_size: usize,
    /// Tickets minted so far (the last issued sequence number).
    pub issued: u64,
    /// Tickets added across all vendors.
    pub total_added: u64,
    /// Tickets handed out to customers.
    pub total_removed: u64,
}

impl PoolStatus {
    /// Free slots left before vendors start waiting.
    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.size)
    }
}
