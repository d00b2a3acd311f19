//! Simulation timing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing knobs for a market run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Simulated delay between vendor batches and between customer
    /// withdrawals (milliseconds).
    #[serde(default = "default_tick")]
    pub tick_ms: u64,

    /// How long the CLI lets the market run before stopping it (seconds).
    #[serde(default = "default_run")]
    pub run_secs: u64,

    /// How long `stop` waits for tasks to wind down before aborting them
    /// (milliseconds).
    #[serde(default = "default_grace")]
    pub shutdown_grace_ms: u64,
}

fn default_tick() -> u64 {
    1000 // 1 second
}

fn default_run() -> u64 {
    10
}

fn default_grace() -> u64 {
    2000
}

impl SimulationSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn run_duration(&self) -> Duration {
        Duration::from_secs(self.run_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick(),
            run_secs: default_run(),
            shutdown_grace_ms: default_grace(),
        }
    }
}
