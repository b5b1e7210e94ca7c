//! Integration tests for ScanController against an in-memory scan service
//!
//! These tests verify:
//! - Presets flow through compilation into the submitted request
//! - The three scan outcomes map to distinct statuses
//! - Only one scan is in flight at a time
//! - Metrics track the round trips

use async_trait::async_trait;
use gearscan::models::{ResultRow, ScanRequest, Stat};
use gearscan::services::{ScanError, ScanService, SortColumn, SubmitOutcome};
use gearscan::ui::ScanEvent;
use gearscan::{Metrics, PresetTable, ScanController, ScanStatus, SelectionManager};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio_test::{assert_err, assert_ok};

/// Scan service stand-in that records requests and replays a canned outcome
struct FakeScanService {
    outcome: Result<SubmitOutcome, String>,
    rows: Vec<ResultRow>,
    requests: Mutex<Vec<ScanRequest>>,
    gate: Option<Arc<Notify>>,
}

impl FakeScanService {
    fn new(outcome: Result<SubmitOutcome, String>, rows: Vec<ResultRow>) -> Self {
        Self {
            outcome,
            rows,
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Hold every submit until the gate is notified
    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn requests(&self) -> Vec<ScanRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScanService for FakeScanService {
    async fn submit(&self, request: &ScanRequest) -> Result<SubmitOutcome, ScanError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.outcome.clone().map_err(ScanError::Rejected)
    }

    async fn fetch_results(&self) -> Result<Vec<ResultRow>, ScanError> {
        Ok(self.rows.clone())
    }
}

fn sample_rows() -> Vec<ResultRow> {
    serde_json::from_value(json!([
        {"realm": "Area 52", "name": "Cord of Haste", "stat1": "Max-Haste", "ilvl": 610, "buyout_gold": "1800"},
        {"realm": "Illidan", "name": "Band", "stat1": "Crit", "ilvl": "590", "buyout_gold": 950}
    ]))
    .unwrap()
}

fn controller(service: Arc<FakeScanService>, metrics: Arc<Metrics>) -> ScanController {
    ScanController::new(
        SelectionManager::with_metrics(metrics),
        Arc::new(PresetTable::builtin()),
        service,
        tokio::runtime::Handle::current(),
    )
}

#[tokio::test]
async fn test_preset_scan_presents_results() {
    let service = Arc::new(FakeScanService::new(Ok(SubmitOutcome::Matches), sample_rows()));
    let metrics = Arc::new(Metrics::new());
    let controller = controller(Arc::clone(&service), Arc::clone(&metrics));

    assert_ok!(controller.apply_preset("custom"));
    let status = controller.submit_scan().unwrap().await.unwrap();

    assert_eq!(status, ScanStatus::Completed { matches: 2 });
    assert_eq!(status.message(), "Scan completed with new results.");

    let requests = service.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].filter_tokens,
        vec!["Haste", "Max-Haste", "Speed", "Prismatic"]
    );

    controller.with_results_mut(|t| t.activate_sort(SortColumn::Buyout));
    let names: Vec<String> =
        controller.with_results(|t| t.rows().map(|r| r.name.clone()).collect());
    assert_eq!(names, vec!["Cord of Haste", "Band"]);

    assert_eq!(metrics.scans_completed.load(Ordering::Relaxed), 1);
    assert_eq!(metrics.rows_presented.load(Ordering::Relaxed), 2);
    assert_eq!(metrics.presets_applied.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn test_no_results_status() {
    let service = Arc::new(FakeScanService::new(Ok(SubmitOutcome::NoResults), sample_rows()));
    let controller = controller(service, Arc::new(Metrics::new()));

    let status = controller.submit_scan().unwrap().await.unwrap();

    assert_eq!(status, ScanStatus::NoResults);
    assert_eq!(
        status.message(),
        "Scan completed but no results matched filters."
    );
    assert!(controller.with_results(|t| t.is_empty()));
}

#[tokio::test]
async fn test_failed_scan_status() {
    let service = Arc::new(FakeScanService::new(Err("realm not found".to_string()), vec![]));
    let metrics = Arc::new(Metrics::new());
    let controller = controller(service, Arc::clone(&metrics));

    let status = controller.submit_scan().unwrap().await.unwrap();

    assert!(matches!(&status, ScanStatus::Failed(reason) if reason.contains("realm not found")));
    assert_eq!(controller.status(), status);
    assert_eq!(metrics.scans_failed.load(Ordering::Relaxed), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_single_scan_in_flight() {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(
        FakeScanService::new(Ok(SubmitOutcome::NoResults), vec![]).gated(Arc::clone(&gate)),
    );
    let metrics = Arc::new(Metrics::new());
    let controller = controller(Arc::clone(&service), Arc::clone(&metrics));
    let mut events = controller.subscribe();

    let first = assert_ok!(controller.submit_scan());
    assert_eq!(controller.status(), ScanStatus::Scanning);
    assert!(matches!(events.recv().await.unwrap(), ScanEvent::Started { .. }));

    let second = controller.submit_scan();
    assert!(matches!(assert_err!(second), ScanError::AlreadyRunning));

    gate.notify_one();
    assert_eq!(first.await.unwrap(), ScanStatus::NoResults);

    // The permit is released once the scan finishes
    gate.notify_one();
    let third = assert_ok!(controller.submit_scan());
    assert_eq!(third.await.unwrap(), ScanStatus::NoResults);

    assert_eq!(service.requests().len(), 2);
    assert_eq!(metrics.scans_refused.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn test_rejected_toggle_leaves_request_unchanged() {
    let service = Arc::new(FakeScanService::new(Ok(SubmitOutcome::NoResults), vec![]));
    let metrics = Arc::new(Metrics::new());
    let controller = controller(Arc::clone(&service), Arc::clone(&metrics));

    let selection = controller.selection();
    selection.set_match_any(false);
    assert_ok!(selection.toggle_primary_stat(Stat::Haste));
    assert_ok!(selection.toggle_primary_stat(Stat::Crit));
    assert_err!(selection.toggle_primary_stat(Stat::Vers));

    controller.submit_scan().unwrap().await.unwrap();

    assert_eq!(service.requests()[0].filter_tokens, vec!["Haste", "Crit"]);
    assert_eq!(metrics.toggles_rejected.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn test_refresh_counts_presented_rows() {
    let service = Arc::new(FakeScanService::new(Ok(SubmitOutcome::NoResults), sample_rows()));
    let metrics = Arc::new(Metrics::new());
    let controller = controller(service, Arc::clone(&metrics));

    let shown = assert_ok!(controller.refresh_results().await);

    assert_eq!(shown, 2);
    assert_eq!(metrics.rows_presented.load(Ordering::Relaxed), 2);
    assert_eq!(metrics.scans_completed.load(Ordering::Relaxed), 0);
}
