//! GearScan - auction gear scanner front end
//!
//! Main entry point for the command-line scanner.
//!
//! # Overview
//!
//! This binary runs one scan with a preset as its filter. It initializes:
//! - Logging infrastructure (file rotation + console output)
//! - Configuration loading ([`ConfigManager`]): user settings and presets
//! - Tokio async runtime (scan round trip)
//! - Selection management ([`SelectionManager`])
//! - The scan controller ([`ScanController`])
//!
//! # Execution Flow
//!
//! 1. Load `GearScan Config.yaml` (+ `GEARSCAN_*` overrides)
//! 2. Initialize logging → logs/gearscan.<date>
//! 3. Load `GearScan Presets.yaml` or the built-in presets
//! 4. Apply the requested preset and scan target
//! 5. Submit the scan and wait for it to finish
//! 6. Print the status line and the result table
//! 7. Log the metrics summary and shut the runtime down

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use gearscan::engine::PresetOutcome;
use gearscan::models::ScanMode;
use gearscan::services::{HttpScanClient, SortColumn};
use gearscan::ui::{ScanStatus, render_table};
use gearscan::{APP_NAME, ConfigManager, Metrics, ScanController, SelectionManager, VERSION};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gearscan", version, about = "Scan auction houses for gear matching a preset")]
struct Cli {
    /// Preset to apply before scanning (defaults to `default_preset` from the config)
    #[arg(value_name = "PRESET")]
    preset: Option<String>,

    /// Scan only this realm instead of all realms
    #[arg(long, value_name = "NAME")]
    realm: Option<String>,

    /// Sort the results by a column (descending)
    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    /// Directory holding `GearScan Config.yaml` and `GearScan Presets.yaml`
    #[arg(long = "config-dir", value_name = "DIR", default_value = "GearScan Data")]
    config_dir: Utf8PathBuf,

    /// Directory for rotating log files
    #[arg(long = "log-dir", value_name = "DIR", default_value = "logs")]
    log_dir: Utf8PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Ilvl,
    Buyout,
}

impl From<SortArg> for SortColumn {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Ilvl => SortColumn::ItemLevel,
            SortArg::Buyout => SortColumn::Buyout,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let user_config = config_manager.load_user_config()?;

    let _guard = gearscan::logging::setup_logging(
        &cli.log_dir,
        "gearscan",
        user_config.debug_mode,
        user_config.console_logging,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let presets = Arc::new(config_manager.load_presets()?);
    tracing::info!(
        "Presets available: {}",
        presets.names().collect::<Vec<_>>().join(", ")
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("gearscan-worker")
        .build()?;

    let metrics = Arc::new(Metrics::new());
    let selection = SelectionManager::with_metrics(Arc::clone(&metrics));

    let client = HttpScanClient::new(&user_config.service_url, user_config.request_timeout_secs)
        .context("Failed to create scan client")?;

    let controller = ScanController::new(
        selection,
        Arc::clone(&presets),
        Arc::new(client),
        runtime.handle().clone(),
    )
    .with_unknown_preset_policy(user_config.unknown_preset);

    if let Some(name) = cli.preset.as_ref().or(user_config.default_preset.as_ref()) {
        match controller.apply_preset(name)? {
            PresetOutcome::Applied => tracing::info!("Applied preset '{}'", name),
            PresetOutcome::Ignored => tracing::warn!("Unknown preset '{}' ignored", name),
        }
    }

    if let Some(realm) = &cli.realm {
        controller.selection().set_scan_mode(ScanMode::SingleRealm);
        controller.selection().set_realm(realm);
    }

    let handle = controller.submit_scan()?;
    let status = runtime
        .block_on(handle)
        .context("Scan task panicked")?;

    println!("{}", status.message());

    if let ScanStatus::Completed { .. } = status {
        if let Some(sort) = cli.sort {
            controller.with_results_mut(|table| table.activate_sort(sort.into()));
        }
        print!("{}", controller.with_results(render_table));
    }

    metrics.log_summary();

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    tracing::info!("Application shutdown complete");

    match status {
        ScanStatus::Failed(reason) => Err(anyhow::anyhow!(reason)),
        _ => Ok(()),
    }
}
