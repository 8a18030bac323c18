//! Headless runner for the Greatness progression engine.
//!
//! This is the main entry point that wires together configuration, the
//! content tables, the save slot and the tick loop. It resumes the saved
//! run, credits the time spent away, and ticks until a termination
//! condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `greatness-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load the content tables (bundled unless a path is configured)
//! 4. Open the save slot and resume the saved run, if any
//! 5. Credit offline progress since the last save
//! 6. Install the ctrl-c handler
//! 7. Run the tick loop
//! 8. Save and log the result

mod clock;
mod control;
mod error;
mod runner;

use std::path::Path;
use std::sync::Arc;

use greatness_content::Catalog;
use greatness_engine::{EngineConfig, Simulation};
use greatness_store::FileStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::clock::{Clock, SystemClock};
use crate::control::RunControl;
use crate::error::RunnerError;
use crate::runner::NoOpCallback;

/// Application entry point for the runner.
///
/// # Errors
///
/// Returns an error if configuration or content cannot be loaded.
/// Persistence failures are logged and do not stop the run.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = Path::new("greatness-config.yaml");
    let config_found = config_path.exists();
    let config = if config_found {
        EngineConfig::from_file(config_path).map_err(RunnerError::from)?
    } else {
        EngineConfig::default()
    };

    // 2. Initialize structured logging.
    init_logging(&config);
    info!("greatness-runner starting");
    if !config_found {
        info!("Config file not found, using defaults");
    }
    info!(
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        save_path = %config.persistence.save_path.display(),
        autosave_interval_secs = config.persistence.autosave_interval_secs,
        "Configuration loaded"
    );

    // 3. Load content.
    let catalog = Arc::new(load_catalog(&config)?);
    info!(
        upgrades = catalog.upgrades.len(),
        events = catalog.events.len(),
        institutions = catalog.institutions.len(),
        countries = catalog.countries.len(),
        "Content loaded"
    );

    // 4. Open the save slot and resume.
    let clock = SystemClock;
    let started_at = clock.now_millis();
    let store = FileStore::new(config.persistence.save_path.clone());
    let mut sim = Simulation::new(catalog, Box::new(store), config.world.seed, started_at);
    if !sim.load() {
        info!("No saved run, starting fresh");
    }

    // 5. Credit time away.
    if let Some(report) = sim.apply_offline_progress(clock.now_millis()) {
        info!(
            elapsed_secs = report.elapsed_secs,
            gained = report.greatness_gained,
            "Welcome back"
        );
    }

    // 6. Install the ctrl-c handler.
    let control = Arc::new(RunControl::new(&config.simulation));
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, stopping after this tick");
                    control.request_stop();
                }
                Err(e) => warn!(error = %e, "failed to listen for ctrl-c"),
            }
        });
    }

    // 7. Run the tick loop.
    let result =
        runner::run_simulation(&mut sim, &clock, &control, &config, &mut NoOpCallback).await;

    // 8. Save and log.
    if let Err(e) = sim.try_save().map_err(RunnerError::from) {
        warn!(error = %e, "Final save failed");
    }
    runner::log_simulation_end(&result, sim.state());

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "greatness-runner shutdown complete"
    );

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(config: &EngineConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load the configured content file, or the bundled tables.
fn load_catalog(config: &EngineConfig) -> Result<Catalog, RunnerError> {
    let catalog = match &config.content.path {
        Some(path) => {
            info!(path = %path.display(), "Loading content file");
            Catalog::from_file(path)?
        }
        None => greatness_content::default_catalog()?,
    };
    Ok(catalog)
}
