//! Market orchestration: vendors and customers sharing one ticket pool.
//!
//! - **Vendors**: one task each, release `total_tickets / vendors` tickets per batch until stopped
//! - **Customers**: one task each, collect `capacity / customers` tickets and finish
//! - **Marketplace**: builds the pool, spawns the tasks, stops them and gathers their reports

mod config;
mod customer;
mod runner;
mod types;
mod vendor;

pub use config::SimulationSettings;
pub use customer::{Customer, CustomerReport};
pub use runner::Marketplace;
pub use types::{MarketError, MarketStatus, RunSummary};
pub use vendor::{Vendor, VendorReport};
