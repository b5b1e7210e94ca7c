//! Data models for the gear scanner.
//!
//! - [`SelectionState`]: the raw filter selection behind the scan form
//! - [`PresetRecord`] / [`PresetTable`]: named filter templates, immutable after startup
//! - [`ScanRequest`]: the compiled, normalized request sent to the scan service
//! - [`ResultRow`]: one matched item returned by the scan service
//! - [`UserConfig`]: user settings loaded from `GearScan Config.yaml`
//! - [`catalog`]: fixed slot and item-type tables
//!
//! # Architecture Note
//!
//! `SelectionState` exposes read accessors only. Mutations go through
//! [`crate::engine`] so the stat invariants cannot be bypassed, and
//! [`SelectionManager`](crate::state::SelectionManager) wraps it for shared access.

pub mod catalog;
pub mod config;
pub mod numeric;
pub mod preset;
pub mod request;
pub mod result_row;
pub mod selection;

pub use config::UserConfig;
pub use preset::{PresetError, PresetRecord, PresetTable, UnknownPresetPolicy};
pub use request::{ScanRequest, StatThresholds};
pub use result_row::ResultRow;
pub use selection::{AuxFlag, NumericField, ScanMode, SelectionState, Stat, StatMode};
