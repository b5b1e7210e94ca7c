// GearScan - Filter selection and result presentation for an auction gear scanner
//
// This is the library crate containing the filter model, constraint engine,
// request compiler and result pipeline. The binary crate (main.rs) runs a
// single scan from the command line.

pub mod config;
pub mod engine;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use metrics::Metrics;
pub use models::{
    PresetRecord, PresetTable, ResultRow, ScanRequest, SelectionState, UnknownPresetPolicy,
    UserConfig,
};
pub use state::{SelectionChange, SelectionManager};
pub use ui::{ScanController, ScanStatus};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
