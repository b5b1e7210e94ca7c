// Selection state management
//
// SelectionManager wraps SelectionState with shared access using
// Arc<RwLock<T>>, routes every mutation through the constraint engine and
// emits change events for whatever renders the form.

use crate::engine::{self, ConstraintError, PresetOutcome};
use crate::metrics::Metrics;
use crate::models::{
    AuxFlag, NumericField, PresetError, PresetTable, ScanMode, ScanRequest, SelectionState, Stat,
    StatMode, UnknownPresetPolicy,
};
use crate::services::compiler;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when the selection is modified
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionChange {
    /// Primary or max stats changed, or the stat controls were locked/unlocked
    StatsChanged {
        match_any_stats: bool,
        controls_enabled: bool,
    },

    SlotsChanged {
        active: usize,
    },

    ArmorTypesChanged {
        active: usize,
    },

    ModeChanged {
        mode: StatMode,
    },

    /// Speed or Prismatic flag flipped
    AuxFiltersChanged,

    ScanTargetChanged {
        scan_mode: ScanMode,
    },

    /// Item level, buyout or threshold text edited
    InputsChanged,

    PresetApplied {
        name: String,
    },

    /// A toggle was refused; `message` is shown to the user
    Warning {
        message: String,
    },
}

/// Shared selection store with event emission
///
/// # Usage
///
/// - [`read()`](Self::read) / [`snapshot()`](Self::snapshot) for reading
/// - the toggle/set methods for mutations, each returning the emitted events
/// - [`subscribe()`](Self::subscribe) for listening to changes
/// - [`compile()`](Self::compile) to snapshot the selection into a request
///
/// Each call holds the write lock for its whole mutation, so a preset
/// application is fully settled before any later read or compile.
pub struct SelectionManager {
    state: Arc<RwLock<SelectionState>>,
    change_tx: broadcast::Sender<SelectionChange>,
    metrics: Arc<Metrics>,
}

impl SelectionManager {
    /// Create a manager with an empty selection and a 100-event buffer
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(Metrics::new()))
    }

    pub fn with_metrics(metrics: Arc<Metrics>) -> Self {
        let (change_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(SelectionState::default())),
            change_tx,
            metrics,
        }
    }

    pub fn snapshot(&self) -> SelectionState {
        self.read(SelectionState::clone)
    }

    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SelectionState) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SelectionChange> {
        self.change_tx.subscribe()
    }

    /// Compile the current selection into a scan request
    pub fn compile(&self) -> ScanRequest {
        self.read(compiler::compile)
    }

    /// Apply a mutation, detect what changed and emit events
    fn mutate<F, T>(&self, f: F) -> (T, Vec<SelectionChange>)
    where
        F: FnOnce(&mut SelectionState) -> T,
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let old_state = state.clone();

        let output = f(&mut state);

        let changes = detect_changes(&old_state, &state);
        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.change_tx.send(change.clone());
        }

        (output, changes)
    }

    fn emit(&self, change: SelectionChange, changes: &mut Vec<SelectionChange>) {
        let _ = self.change_tx.send(change.clone());
        changes.push(change);
    }

    fn stat_toggle_result(
        &self,
        result: Result<engine::Toggle, ConstraintError>,
        changes: Vec<SelectionChange>,
    ) -> Result<Vec<SelectionChange>, ConstraintError> {
        match result {
            Ok(_) => {
                self.metrics.record_toggle_accepted();
                Ok(changes)
            }
            Err(e) => {
                tracing::warn!("Stat toggle rejected: {}", e);
                self.metrics.record_toggle_rejected();
                let _ = self.change_tx.send(SelectionChange::Warning {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Check or uncheck a primary stat. A rejected toggle emits a
    /// [`SelectionChange::Warning`] and returns the error.
    pub fn toggle_primary_stat(&self, stat: Stat) -> Result<Vec<SelectionChange>, ConstraintError> {
        let (result, changes) = self.mutate(|state| engine::toggle_primary_stat(state, stat));
        self.stat_toggle_result(result, changes)
    }

    pub fn toggle_max_stat(&self, stat: Stat) -> Result<Vec<SelectionChange>, ConstraintError> {
        let (result, changes) = self.mutate(|state| engine::toggle_max_stat(state, stat));
        self.stat_toggle_result(result, changes)
    }

    /// Drive the "All Stats" checkbox
    pub fn set_match_any(&self, enabled: bool) -> Vec<SelectionChange> {
        self.mutate(|state| engine::set_match_any(state, enabled)).1
    }

    pub fn set_mode(&self, mode: StatMode) -> Vec<SelectionChange> {
        self.mutate(|state| engine::set_mode(state, mode)).1
    }

    pub fn toggle_slot(&self, slot: &str) -> Vec<SelectionChange> {
        self.metrics.record_toggle_accepted();
        self.mutate(|state| engine::toggle_slot(state, slot)).1
    }

    pub fn toggle_armor_type(&self, armor_type: &str) -> Vec<SelectionChange> {
        self.metrics.record_toggle_accepted();
        self.mutate(|state| engine::toggle_armor_type(state, armor_type)).1
    }

    pub fn set_aux_flag(&self, flag: AuxFlag, on: bool) -> Vec<SelectionChange> {
        self.mutate(|state| engine::set_aux_flag(state, flag, on)).1
    }

    pub fn set_scan_mode(&self, mode: ScanMode) -> Vec<SelectionChange> {
        self.mutate(|state| engine::set_scan_mode(state, mode)).1
    }

    pub fn set_realm(&self, realm: &str) -> Vec<SelectionChange> {
        self.mutate(|state| engine::set_realm(state, realm)).1
    }

    pub fn set_numeric_input(&self, field: NumericField, text: &str) -> Vec<SelectionChange> {
        self.mutate(|state| engine::set_numeric_input(state, field, text)).1
    }

    pub fn set_threshold_input(&self, stat: Stat, text: &str) -> Vec<SelectionChange> {
        self.mutate(|state| engine::set_threshold_input(state, stat, text)).1
    }

    /// Overwrite the selection with a named preset
    ///
    /// Emits the detected field changes followed by
    /// [`SelectionChange::PresetApplied`]. An ignored unknown name emits nothing.
    pub fn apply_preset(
        &self,
        table: &PresetTable,
        name: &str,
        policy: UnknownPresetPolicy,
    ) -> Result<(PresetOutcome, Vec<SelectionChange>), PresetError> {
        let (result, mut changes) =
            self.mutate(|state| engine::apply_preset(state, table, name, policy));

        let outcome = result?;
        if outcome == PresetOutcome::Applied {
            self.metrics.record_preset_applied();
            self.emit(
                SelectionChange::PresetApplied {
                    name: name.to_string(),
                },
                &mut changes,
            );
        }

        Ok((outcome, changes))
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}

/// Detect what changed between two selections and generate events
fn detect_changes(old: &SelectionState, new: &SelectionState) -> Vec<SelectionChange> {
    let mut changes = Vec::new();

    if old.primary_stats() != new.primary_stats()
        || old.max_stat() != new.max_stat()
        || old.stat_controls_enabled() != new.stat_controls_enabled()
    {
        changes.push(SelectionChange::StatsChanged {
            match_any_stats: new.match_any_stats(),
            controls_enabled: new.stat_controls_enabled(),
        });
    }

    if old.active_slots() != new.active_slots() {
        changes.push(SelectionChange::SlotsChanged {
            active: new.active_slots().len(),
        });
    }

    if old.active_armor_types() != new.active_armor_types() {
        changes.push(SelectionChange::ArmorTypesChanged {
            active: new.active_armor_types().len(),
        });
    }

    if old.stat_mode() != new.stat_mode() {
        changes.push(SelectionChange::ModeChanged {
            mode: new.stat_mode(),
        });
    }

    if old.aux_flag(AuxFlag::Speed) != new.aux_flag(AuxFlag::Speed)
        || old.aux_flag(AuxFlag::Prismatic) != new.aux_flag(AuxFlag::Prismatic)
    {
        changes.push(SelectionChange::AuxFiltersChanged);
    }

    if old.scan_mode() != new.scan_mode() || old.realm() != new.realm() {
        changes.push(SelectionChange::ScanTargetChanged {
            scan_mode: new.scan_mode(),
        });
    }

    let inputs_changed = [
        NumericField::MinIlvl,
        NumericField::MaxIlvl,
        NumericField::MaxBuyout,
    ]
    .into_iter()
    .any(|field| old.numeric_input(field) != new.numeric_input(field))
        || Stat::ALL
            .into_iter()
            .any(|stat| old.threshold_input(stat) != new.threshold_input(stat));
    if inputs_changed {
        changes.push(SelectionChange::InputsChanged);
    }

    changes
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share the same selection and event channel
impl Clone for SelectionManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            change_tx: self.change_tx.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}
