mod metrics;
mod prompt;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticketmarket_core::{
    load_settings, load_settings_from_env, try_load_market_config, try_save_market_config,
    validate_market_config, validate_settings, ConfigError, MarketConfig, Marketplace, RunSummary,
    Settings,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings_path = std::env::var("TICKETMARKET_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("ticketmarket.toml"));

    info!("Loading settings from {:?}", settings_path);
    let settings = match load_settings(&settings_path) {
        Ok(settings) => settings,
        Err(ConfigError::FileNotFound(_)) => {
            info!("No settings file found, using defaults");
            load_settings_from_env().context("Failed to load settings from environment")?
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to load settings from {:?}", settings_path))
        }
    };
    validate_settings(&settings).context("Settings validation failed")?;

    let config = acquire_market_config(&settings).await?;

    println!("Configuration inputs received successfully!");
    println!("Total Tickets: {}", config.total_tickets);
    println!("Ticket Release Rate: {}", config.ticket_release_rate);
    println!("Customer Retrieval Rate: {}", config.customer_retrieval_rate);
    println!("Max Ticket Capacity: {}", config.max_ticket_capacity);

    let market = Marketplace::new(config, settings.simulation.clone())
        .context("Failed to create marketplace")?;
    market.start().await.context("Failed to start marketplace")?;

    info!("System running... (Press Ctrl+C to halt the system)");
    tokio::select! {
        _ = tokio::time::sleep(settings.simulation.run_duration()) => {
            info!("Run time of {}s elapsed", settings.simulation.run_secs);
        }
        _ = shutdown_signal() => {
            info!("System halted");
        }
    }

    let summary = market.stop().await;
    print_summary(&summary);
    debug!("Metrics:\n{}", metrics::encode_metrics());

    Ok(())
}

/// Load the saved market configuration, or ask for one on stdin.
///
/// A freshly entered configuration is saved for the next run.
async fn acquire_market_config(settings: &Settings) -> Result<MarketConfig> {
    let path = settings.market_config_path.clone();

    if path.exists() {
        if let Some(config) = try_load_market_config(&path) {
            match validate_market_config(&config) {
                Ok(()) => return Ok(config),
                Err(e) => warn!("Ignoring saved configuration in {:?}: {}", path, e),
            }
        }
    }

    let config = tokio::task::spawn_blocking(|| {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        prompt::prompt_market_config(&mut stdin.lock(), &mut stdout.lock())
    })
    .await
    .context("Configuration prompt task failed")??;

    try_save_market_config(&config, &path);
    Ok(config)
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Tickets released: {}, sold: {}, left in pool: {}",
        summary.tickets_released(),
        summary.tickets_sold(),
        summary.pool.size
    );
    for customer in &summary.customers {
        let status = if customer.completed {
            "complete"
        } else {
            "incomplete"
        };
        println!(
            "Customer {} ({}/{} tickets, {}): {}",
            customer.customer_id,
            customer.tickets.len(),
            customer.quota,
            status,
            customer.labels().join(", ")
        );
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
