//! Marketplace implementation.
//!
//! Owns the shared pool and the spawned vendor and customer tasks. All tasks
//! get a child of one shutdown token, so `stop` cancels everything at once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::config::SimulationSettings;
use super::customer::{Customer, CustomerReport};
use super::types::{MarketError, MarketStatus, RunSummary};
use super::vendor::{Vendor, VendorReport};
use crate::config::{validate_market_config, MarketConfig};
use crate::pool::TicketPool;

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs one market: a pool, its vendors and its customers.
pub struct Marketplace {
    config: MarketConfig,
    settings: SimulationSettings,
    pool: Arc<TicketPool>,

    // Runtime state
    running: AtomicBool,
    started_at: RwLock<Option<DateTime<Utc>>>,
    shutdown: CancellationToken,
    vendors: Mutex<Vec<JoinHandle<VendorReport>>>,
    customers: Mutex<Vec<JoinHandle<CustomerReport>>>,
}

impl Marketplace {
    /// Create a marketplace for a validated configuration.
    pub fn new(config: MarketConfig, settings: SimulationSettings) -> Result<Self, MarketError> {
        validate_market_config(&config)?;

        Ok(Self {
            pool: Arc::new(TicketPool::new(config.capacity())),
            config,
            settings,
            running: AtomicBool::new(false),
            started_at: RwLock::new(None),
            shutdown: CancellationToken::new(),
            vendors: Mutex::new(Vec::new()),
            customers: Mutex::new(Vec::new()),
        })
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Shared handle to the pool.
    pub fn pool(&self) -> Arc<TicketPool> {
        Arc::clone(&self.pool)
    }

    /// Spawn all vendor and customer tasks.
    pub async fn start(&self) -> Result<(), MarketError> {
        if self.shutdown.is_cancelled() {
            warn!("Market already stopped");
            return Err(MarketError::AlreadyStopped);
        }
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Market already running");
            return Err(MarketError::AlreadyRunning);
        }

        let batch_size = self.config.batch_size();
        let quota = self.config.customer_quota();
        let tick = self.settings.tick();

        info!(
            "Starting market: {} vendors x {} tickets/batch, {} customers x {} tickets, capacity {}",
            self.config.vendor_count(),
            batch_size,
            self.config.customer_count(),
            quota,
            self.pool.capacity()
        );

        *self.started_at.write().await = Some(Utc::now());

        {
            let mut vendors = self.vendors.lock().await;
            for id in 1..=self.config.vendor_count() {
                let vendor = Vendor::new(id, Arc::clone(&self.pool), batch_size, tick);
                vendors.push(tokio::spawn(vendor.run(self.shutdown.child_token())));
            }
        }

        {
            let mut customers = self.customers.lock().await;
            for id in 1..=self.config.customer_count() {
                let customer = Customer::new(id, Arc::clone(&self.pool), quota, tick);
                customers.push(tokio::spawn(customer.run(self.shutdown.child_token())));
            }
        }

        info!("Market started");
        Ok(())
    }

    /// Cancel every task and collect their reports.
    ///
    /// Tasks get `shutdown_grace` to finish; any still running after that are
    /// aborted and left out of the summary.
    pub async fn stop(&self) -> RunSummary {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Market not running");
        }

        info!("Stopping market");
        self.shutdown.cancel();

        let vendors = std::mem::take(&mut *self.vendors.lock().await);
        let customers = std::mem::take(&mut *self.customers.lock().await);
        let deadline = Instant::now() + self.settings.shutdown_grace();

        let (vendors, customers) = tokio::join!(
            join_reports("Vendor", vendors, deadline),
            join_reports("Customer", customers, deadline),
        );

        let summary = RunSummary {
            started_at: *self.started_at.read().await,
            stopped_at: Utc::now(),
            vendors,
            customers,
            pool: self.pool.status().await,
        };

        info!(
            "Market stopped: {} tickets released, {} sold, {} left in pool",
            summary.tickets_released(),
            summary.tickets_sold(),
            summary.pool.size
        );
        summary
    }

    /// Wait until every customer task has finished, up to `timeout`.
    ///
    /// Returns false on timeout.
    pub async fn wait_for_customers(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let done = self
                .customers
                .lock()
                .await
                .iter()
                .all(|handle| handle.is_finished());
            if done {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    /// Get current market status.
    pub async fn status(&self) -> MarketStatus {
        let vendors_active = count_active(&*self.vendors.lock().await);
        let customers_active = count_active(&*self.customers.lock().await);

        MarketStatus {
            running: self.running.load(Ordering::Relaxed),
            started_at: *self.started_at.read().await,
            batch_size: self.config.batch_size(),
            customer_quota: self.config.customer_quota(),
            vendors_active,
            customers_active,
            pool: self.pool.status().await,
        }
    }
}

fn count_active<T>(handles: &[JoinHandle<T>]) -> usize {
    handles.iter().filter(|handle| !handle.is_finished()).count()
}

/// Join task handles until `deadline`, aborting stragglers.
async fn join_reports<T>(kind: &str, handles: Vec<JoinHandle<T>>, deadline: Instant) -> Vec<T> {
    let results = join_all(handles.into_iter().map(|handle| async move {
        let abort = handle.abort_handle();
        match tokio::time::timeout_at(deadline, handle).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(e)) => {
                error!("{} task failed: {}", kind, e);
                None
            }
            Err(_) => {
                warn!("{} task did not stop in time, aborting", kind);
                abort.abort();
                None
            }
        }
    }))
    .await;

    results.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    fn fast_settings() -> SimulationSettings {
        SimulationSettings {
            tick_ms: 1,
            run_secs: 1,
            shutdown_grace_ms: 2000,
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Marketplace::new(MarketConfig::new(5, 1, 1, 10), fast_settings());
        assert!(matches!(
            result,
            Err(MarketError::InvalidConfig(ConfigError::ValidationError(_)))
        ));

        let result = Marketplace::new(MarketConfig::new(5, 0, 1, 5), fast_settings());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_status_before_start() {
        let market = Marketplace::new(MarketConfig::new(20, 3, 2, 9), fast_settings()).unwrap();
        let status = market.status().await;

        assert!(!status.running);
        assert!(status.started_at.is_none());
        assert_eq!(status.batch_size, 6);
        assert_eq!(status.customer_quota, 4);
        assert_eq!(status.pool.capacity, 9);
        assert_eq!(market.pool().capacity(), 9);
    }

    #[tokio::test]
    async fn test_start_twice_and_after_stop() {
        let market = Marketplace::new(MarketConfig::new(10, 1, 1, 10), fast_settings()).unwrap();

        market.start().await.unwrap();
        assert!(matches!(
            market.start().await,
            Err(MarketError::AlreadyRunning)
        ));

        market.stop().await;
        assert!(matches!(
            market.start().await,
            Err(MarketError::AlreadyStopped)
        ));
    }

    #[tokio::test]
    async fn test_stop_without_start_is_empty() {
        let market = Marketplace::new(MarketConfig::new(10, 1, 1, 10), fast_settings()).unwrap();
        let summary = market.stop().await;

        assert!(summary.started_at.is_none());
        assert!(summary.vendors.is_empty());
        assert!(summary.customers.is_empty());
        assert_eq!(summary.pool.issued, 0);
    }

    #[tokio::test]
    async fn test_join_reports_skips_panicked_task() {
        let ok = tokio::spawn(async { 1 });
        let failed: JoinHandle<i32> = tokio::spawn(async {
            panic!("customer blew up");
        });
        let deadline = Instant::now() + Duration::from_secs(5);

        let reports: Vec<i32> = join_reports("Test", vec![ok, failed], deadline).await;
        assert_eq!(reports, vec![1]);
    }

    #[tokio::test]
    async fn test_join_reports_aborts_stragglers() {
        let stuck = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            1
        });
        let done = tokio::spawn(async { 2 });
        let deadline = Instant::now() + Duration::from_millis(50);

        let reports: Vec<i32> = join_reports("Test", vec![stuck, done], deadline).await;
        assert_eq!(reports, vec![2]);
    }
}
