//! Bounded ticket pool shared by vendors and customers.
//!
//! The pool is the only shared mutable state in a market run:
//! - **Vendors** insert whole batches and wait while a batch would overflow capacity
//! - **Customers** remove one ticket at a time and wait while the pool is empty
//! - Every state change wakes all waiters, who re-check their own condition

mod ticket_pool;
mod types;

pub use ticket_pool::TicketPool;
pub use types::{PoolError, PoolStatus, Ticket};
