// Session metrics
//
// Lightweight counters for filter interaction and scan round trips

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Session-wide counters.
///
/// Uses atomic operations so the selection manager (UI thread) and scan tasks
/// (tokio workers) can record without locks. Logged on shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Accepted stat, slot and armor-type toggles
    pub toggles_accepted: AtomicU64,

    /// Stat toggles refused by the constraint engine
    pub toggles_rejected: AtomicU64,

    /// Presets applied (unknown names not counted)
    pub presets_applied: AtomicU64,

    /// Scans handed to the scan service
    pub scans_submitted: AtomicUsize,

    /// Scans that produced new results
    pub scans_completed: AtomicUsize,

    /// Scans that ran but matched nothing
    pub scans_empty: AtomicUsize,

    /// Scans that failed to run or whose results could not be fetched
    pub scans_failed: AtomicUsize,

    /// Submits refused because a scan was already running
    pub scans_refused: AtomicUsize,

    /// Rows rendered into the result table
    pub rows_presented: AtomicU64,

    /// Total scan round-trip time in milliseconds
    pub total_scan_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            toggles_accepted: AtomicU64::new(0),
            toggles_rejected: AtomicU64::new(0),
            presets_applied: AtomicU64::new(0),
            scans_submitted: AtomicUsize::new(0),
            scans_completed: AtomicUsize::new(0),
            scans_empty: AtomicUsize::new(0),
            scans_failed: AtomicUsize::new(0),
            scans_refused: AtomicUsize::new(0),
            rows_presented: AtomicU64::new(0),
            total_scan_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_toggle_accepted(&self) {
        self.toggles_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_toggle_rejected(&self) {
        self.toggles_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_preset_applied(&self) {
        self.presets_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scan_submitted(&self) {
        self.scans_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scan_completed(&self, rows: usize) {
        self.scans_completed.fetch_add(1, Ordering::Relaxed);
        self.record_rows_presented(rows);
    }

    pub fn record_rows_presented(&self, rows: usize) {
        self.rows_presented.fetch_add(rows as u64, Ordering::Relaxed);
    }

    pub fn record_scan_empty(&self) {
        self.scans_empty.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scan_failed(&self) {
        self.scans_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scan_refused(&self) {
        self.scans_refused.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scan_time(&self, duration: Duration) {
        self.total_scan_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average round trip over every scan that finished, in milliseconds
    pub fn avg_scan_time_ms(&self) -> f64 {
        let total = self.total_scan_time_ms.load(Ordering::Relaxed);
        let count = self.scans_completed.load(Ordering::Relaxed)
            + self.scans_empty.load(Ordering::Relaxed)
            + self.scans_failed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Session Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Toggles: {} accepted, {} rejected; presets applied: {}",
            self.toggles_accepted.load(Ordering::Relaxed),
            self.toggles_rejected.load(Ordering::Relaxed),
            self.presets_applied.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Scans: {} submitted, {} with results, {} empty, {} failed, {} refused",
            self.scans_submitted.load(Ordering::Relaxed),
            self.scans_completed.load(Ordering::Relaxed),
            self.scans_empty.load(Ordering::Relaxed),
            self.scans_failed.load(Ordering::Relaxed),
            self.scans_refused.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Rows presented: {} (avg scan {:.0}ms)",
            self.rows_presented.load(Ordering::Relaxed),
            self.avg_scan_time_ms()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.scans_submitted.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.toggles_rejected.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_scan_outcomes() {
        let metrics = Metrics::new();

        metrics.record_scan_submitted();
        metrics.record_scan_completed(12);
        metrics.record_scan_submitted();
        metrics.record_scan_empty();
        metrics.record_scan_refused();

        assert_eq!(metrics.scans_submitted.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.scans_completed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.scans_empty.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.scans_refused.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.rows_presented.load(Ordering::Relaxed), 12);
    }

    #[test]
    fn test_avg_scan_time() {
        let metrics = Metrics::new();
        assert_eq!(metrics.avg_scan_time_ms(), 0.0);

        metrics.record_scan_completed(1);
        metrics.record_scan_time(Duration::from_millis(300));
        metrics.record_scan_failed();
        metrics.record_scan_time(Duration::from_millis(100));

        assert_eq!(metrics.avg_scan_time_ms(), 200.0);
    }
}
