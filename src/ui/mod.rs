// UI module - scan form controller and result rendering
//
// This module contains:
// - ScanController: wires the filter selection, presets and scan service together
// - render_table: bordered terminal rendering of the result table

pub mod controller;
pub mod table;

pub use controller::{ScanController, ScanEvent, ScanStatus, scan_summary};
pub use table::render_table;
