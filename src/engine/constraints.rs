use crate::models::{AuxFlag, NumericField, ScanMode, SelectionState, Stat, StatMode};
use thiserror::Error;

/// Hard cap on simultaneously selected primary stats.
pub const MAX_PRIMARY_STATS: usize = 2;

/// A stat toggle the engine refused. The selection is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("You can select up to {limit} stats.")]
    TooManyPrimaryStats { limit: usize },

    #[error("Stat checkboxes are disabled while 'All Stats' is checked")]
    StatControlsLocked,
}

/// Resulting checked state of a toggled control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Checked,
    Unchecked,
}

impl Toggle {
    pub fn is_checked(self) -> bool {
        self == Toggle::Checked
    }
}

// Every accepted stat toggle re-derives the "All Stats" state from the
// selection, dropping any pending manual unlock.
fn settle_stat_controls(state: &mut SelectionState) {
    state.stat_controls_unlocked = false;
}

/// Check or uncheck a primary stat.
///
/// Checking a third stat is rejected, not resolved by evicting an older one.
pub fn toggle_primary_stat(
    state: &mut SelectionState,
    stat: Stat,
) -> Result<Toggle, ConstraintError> {
    if !state.stat_controls_enabled() {
        return Err(ConstraintError::StatControlsLocked);
    }

    let toggle = if state.primary_stats.remove(&stat) {
        Toggle::Unchecked
    } else {
        if state.primary_stats.len() >= MAX_PRIMARY_STATS {
            return Err(ConstraintError::TooManyPrimaryStats {
                limit: MAX_PRIMARY_STATS,
            });
        }
        state.primary_stats.insert(stat);
        Toggle::Checked
    };

    settle_stat_controls(state);
    Ok(toggle)
}

/// Check or uncheck a max stat. Checking one replaces any other.
pub fn toggle_max_stat(state: &mut SelectionState, stat: Stat) -> Result<Toggle, ConstraintError> {
    if !state.stat_controls_enabled() {
        return Err(ConstraintError::StatControlsLocked);
    }

    let toggle = if state.max_stat == Some(stat) {
        state.max_stat = None;
        Toggle::Unchecked
    } else {
        state.max_stat = Some(stat);
        Toggle::Checked
    };

    settle_stat_controls(state);
    Ok(toggle)
}

/// Drive the "All Stats" checkbox.
///
/// Checking it clears every stat selection. Unchecking it only re-enables
/// the stat checkboxes; the selection is kept as is.
pub fn set_match_any(state: &mut SelectionState, enabled: bool) {
    if enabled {
        state.primary_stats.clear();
        state.max_stat = None;
        state.stat_controls_unlocked = false;
    } else {
        state.stat_controls_unlocked = true;
    }
}

/// Switch stat mode. Selections of the other mode are kept.
pub fn set_mode(state: &mut SelectionState, mode: StatMode) {
    state.stat_mode = mode;
}

/// Flip a slot button. Returns whether the slot is now active.
pub fn toggle_slot(state: &mut SelectionState, slot: &str) -> bool {
    let active = !state.active_slots.contains(slot);
    set_slot_active(state, slot, active);
    active
}

pub fn set_slot_active(state: &mut SelectionState, slot: &str, active: bool) {
    if active {
        state.active_slots.insert(slot.to_string());
    } else {
        state.active_slots.shift_remove(slot);
    }
}

/// Flip an armor-type button. Returns whether the type is now active.
pub fn toggle_armor_type(state: &mut SelectionState, armor_type: &str) -> bool {
    let active = !state.active_armor_types.contains(armor_type);
    set_armor_type_active(state, armor_type, active);
    active
}

pub fn set_armor_type_active(state: &mut SelectionState, armor_type: &str, active: bool) {
    if active {
        state.active_armor_types.insert(armor_type.to_string());
    } else {
        state.active_armor_types.shift_remove(armor_type);
    }
}

pub fn set_aux_flag(state: &mut SelectionState, flag: AuxFlag, on: bool) {
    *state.aux_flag_mut(flag) = on;
}

pub fn set_scan_mode(state: &mut SelectionState, mode: ScanMode) {
    state.scan_mode = mode;
}

/// Store the realm text as typed. Trimming happens at compile time.
pub fn set_realm(state: &mut SelectionState, realm: &str) {
    state.realm = realm.to_string();
}

pub fn set_numeric_input(state: &mut SelectionState, field: NumericField, text: &str) {
    *state.numeric_input_mut(field) = text.to_string();
}

pub fn set_threshold_input(state: &mut SelectionState, stat: Stat, text: &str) {
    if text.is_empty() {
        state.threshold_inputs.remove(&stat);
    } else {
        state.threshold_inputs.insert(stat, text.to_string());
    }
}

/// Clear everything a preset overwrites: stats, slots, armor types, aux flags
/// and the item-level/price fields. Stat mode, scan target and thresholds stay.
pub(crate) fn reset_filters(state: &mut SelectionState) {
    set_match_any(state, true);
    state.active_slots.clear();
    state.active_armor_types.clear();
    state.speed = false;
    state.prismatic = false;
    state.min_ilvl.clear();
    state.max_ilvl.clear();
    state.max_buyout.clear();
}
