// Scan Controller - Bridges the filter form with the scan service
//
// This module contains the ScanController which coordinates between:
// - SelectionManager (filter selection + constraint engine)
// - PresetTable (named filter templates)
// - ScanService (remote scan + result fetch)
// - ResultTable (presented, sortable results)
//
// It handles:
// - Preset buttons → preset loader
// - Submit → compile request → fire-and-forget scan on the tokio runtime
// - Scan response → status text + table refresh

use crate::engine::PresetOutcome;
use crate::metrics::Metrics;
use crate::models::{PresetError, PresetTable, ScanRequest, UnknownPresetPolicy};
use crate::services::presenter::format_gold;
use crate::services::{ResultTable, ScanError, ScanService, SubmitOutcome};
use crate::state::SelectionManager;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tokio::sync::{Semaphore, broadcast};
use tokio::task::JoinHandle;

/// Maximum number of scans outstanding at once.
///
/// A second submit while a scan is pending is refused with
/// [`ScanError::AlreadyRunning`] rather than queued.
pub const MAX_IN_FLIGHT_SCANS: usize = 1;

/// Where the last scan stands, as shown in the status area
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    Idle,
    Scanning,
    /// Ran fine with matches available
    Completed { matches: usize },
    /// Ran fine with zero matches
    NoResults,
    /// Failed to run; carries the user-facing reason
    Failed(String),
}

impl ScanStatus {
    /// User-facing status line
    pub fn message(&self) -> String {
        match self {
            ScanStatus::Idle => String::new(),
            ScanStatus::Scanning => "Scanning...".to_string(),
            ScanStatus::Completed { .. } => "Scan completed with new results.".to_string(),
            ScanStatus::NoResults => "Scan completed but no results matched filters.".to_string(),
            ScanStatus::Failed(reason) => reason.clone(),
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, ScanStatus::Idle | ScanStatus::Scanning)
    }
}

/// Events emitted around a scan round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Started { summary: String },
    Finished(ScanStatus),
    ResultsRefreshed { rows: usize },
}

/// One-paragraph preview of what a request will scan for
pub fn scan_summary(request: &ScanRequest) -> String {
    let filters = if request.filter_tokens.is_empty() {
        "All".to_string()
    } else {
        request.filter_tokens.join(", ")
    };

    format!(
        "Item Level: {}–{} | Max Buyout: {} | Filters: {}",
        request.min_ilvl,
        request.max_ilvl,
        format_gold(i64::try_from(request.max_buyout).unwrap_or(i64::MAX)),
        filters
    )
}

/// Coordinates the filter form, the scan service and the result table
///
/// Filter interaction runs synchronously on the caller's thread. Only the
/// scan round trip is spawned onto the tokio runtime, and its completion
/// arrives later as a [`ScanEvent::Finished`].
///
/// # Example
/// ```ignore
/// let controller = ScanController::new(
///     SelectionManager::new(),
///     Arc::new(PresetTable::builtin()),
///     Arc::new(HttpScanClient::new("http://127.0.0.1:5000", 900)?),
///     runtime.handle().clone(),
/// );
/// controller.apply_preset("profitable")?;
/// let status = runtime.block_on(controller.submit_scan()?)?;
/// ```
pub struct ScanController {
    selection: SelectionManager,
    presets: Arc<PresetTable>,
    unknown_preset: UnknownPresetPolicy,
    service: Arc<dyn ScanService>,
    results: Arc<RwLock<ResultTable>>,
    status: Arc<RwLock<ScanStatus>>,
    in_flight: Arc<Semaphore>,
    metrics: Arc<Metrics>,
    runtime: tokio::runtime::Handle,
    event_tx: broadcast::Sender<ScanEvent>,
}

impl ScanController {
    pub fn new(
        selection: SelectionManager,
        presets: Arc<PresetTable>,
        service: Arc<dyn ScanService>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(32);
        let metrics = Arc::clone(selection.metrics());

        tracing::info!("Scan controller initialized with {} presets", presets.len());

        Self {
            selection,
            presets,
            unknown_preset: UnknownPresetPolicy::default(),
            service,
            results: Arc::new(RwLock::new(ResultTable::new())),
            status: Arc::new(RwLock::new(ScanStatus::Idle)),
            in_flight: Arc::new(Semaphore::new(MAX_IN_FLIGHT_SCANS)),
            metrics,
            runtime,
            event_tx,
        }
    }

    pub fn with_unknown_preset_policy(mut self, policy: UnknownPresetPolicy) -> Self {
        self.unknown_preset = policy;
        self
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.event_tx.subscribe()
    }

    pub fn status(&self) -> ScanStatus {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Execute a function with read access to the result table
    pub fn with_results<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ResultTable) -> R,
    {
        let table = self.results.read().unwrap_or_else(PoisonError::into_inner);
        f(&table)
    }

    /// Execute a function with write access to the result table (sorting)
    pub fn with_results_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ResultTable) -> R,
    {
        let mut table = self.results.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut table)
    }

    /// Preset button handler
    pub fn apply_preset(&self, name: &str) -> Result<PresetOutcome, PresetError> {
        let (outcome, _) = self
            .selection
            .apply_preset(&self.presets, name, self.unknown_preset)?;
        Ok(outcome)
    }

    /// Submit handler
    ///
    /// Compiles the current selection and hands it to the scan service on the
    /// runtime without waiting. The returned handle resolves to the final
    /// status; dropping it does not cancel the scan.
    pub fn submit_scan(&self) -> Result<JoinHandle<ScanStatus>, ScanError> {
        let permit = match Arc::clone(&self.in_flight).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::warn!("Scan submit refused: a scan is already running");
                self.metrics.record_scan_refused();
                return Err(ScanError::AlreadyRunning);
            }
        };

        let request = self.selection.compile();
        let summary = scan_summary(&request);
        tracing::info!("Running scan with {}", summary);

        set_status(&self.status, ScanStatus::Scanning);
        self.metrics.record_scan_submitted();
        let _ = self.event_tx.send(ScanEvent::Started { summary });

        let service = Arc::clone(&self.service);
        let results = Arc::clone(&self.results);
        let status = Arc::clone(&self.status);
        let metrics = Arc::clone(&self.metrics);
        let event_tx = self.event_tx.clone();

        Ok(self.runtime.spawn(async move {
            let _permit = permit;
            let started = Instant::now();

            let final_status = run_scan(service.as_ref(), &request, &results).await;

            metrics.record_scan_time(started.elapsed());
            match &final_status {
                ScanStatus::Completed { matches } => metrics.record_scan_completed(*matches),
                ScanStatus::NoResults => metrics.record_scan_empty(),
                ScanStatus::Failed(reason) => {
                    tracing::error!("Scan round trip failed: {}", reason);
                    metrics.record_scan_failed();
                }
                ScanStatus::Idle | ScanStatus::Scanning => {}
            }

            tracing::info!("{}", final_status.message());
            set_status(&status, final_status.clone());
            let _ = event_tx.send(ScanEvent::Finished(final_status.clone()));
            final_status
        }))
    }

    /// Reload the result table from the service without running a scan
    pub async fn refresh_results(&self) -> Result<usize, ScanError> {
        let rows = self.service.fetch_results().await?;
        let shown = self
            .results
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .present(&rows);
        self.metrics.record_rows_presented(shown);

        let _ = self.event_tx.send(ScanEvent::ResultsRefreshed { rows: shown });
        Ok(shown)
    }
}

fn set_status(status: &RwLock<ScanStatus>, value: ScanStatus) {
    *status.write().unwrap_or_else(PoisonError::into_inner) = value;
}

async fn run_scan(
    service: &dyn ScanService,
    request: &ScanRequest,
    results: &RwLock<ResultTable>,
) -> ScanStatus {
    match service.submit(request).await {
        Ok(SubmitOutcome::NoResults) => {
            results
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
            ScanStatus::NoResults
        }
        Ok(SubmitOutcome::Matches) => match service.fetch_results().await {
            Ok(rows) => {
                let matches = results
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .present(&rows);
                ScanStatus::Completed { matches }
            }
            Err(e) => ScanStatus::Failed(e.to_string()),
        },
        Err(e) => ScanStatus::Failed(e.to_string()),
    }
}
