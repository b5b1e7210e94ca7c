//! Services module - request compilation, result presentation, scan transport.
//!
//! # Components
//!
//! - [`compiler`]: turns a [`SelectionState`](crate::models::SelectionState) into a
//!   [`ScanRequest`](crate::models::ScanRequest). Pure and deterministic.
//! - [`presenter`]: turns fetched result rows into display rows with independent
//!   numeric sort keys, and keeps the sortable [`ResultTable`].
//! - [`scan_client`]: the [`ScanService`] seam and its HTTP implementation.
//!
//! Nothing here touches the UI layer; the compiler and presenter do no I/O at all.

pub mod compiler;
pub mod presenter;
pub mod scan_client;

pub use compiler::compile;
pub use presenter::{DisplayRow, ResultTable, SortColumn, SortDirection};
pub use scan_client::{HttpScanClient, ScanError, ScanService, SubmitOutcome};
