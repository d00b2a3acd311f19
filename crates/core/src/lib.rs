pub mod config;
pub mod market;
pub mod metrics;
pub mod pool;

pub use config::{
    load_market_config, load_settings, load_settings_from_env, load_settings_from_str,
    save_market_config, try_load_market_config, try_save_market_config, validate_market_config,
    validate_settings, ConfigError, MarketConfig, Settings,
};
pub use market::{
    Customer, CustomerReport, MarketError, MarketStatus, Marketplace, RunSummary,
    SimulationSettings, Vendor, VendorReport,
};
pub use pool::{PoolError, PoolStatus, Ticket, TicketPool};
