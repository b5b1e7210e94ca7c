//! Constraint engine and preset loader.
//!
//! All mutations of [`SelectionState`](crate::models::SelectionState) live here.
//! The engine upholds, after every call:
//! - at most [`MAX_PRIMARY_STATS`] primary stats (a third is rejected, never evicts)
//! - at most one max stat (checking one replaces the other)
//! - stat checkboxes are disabled exactly while "All Stats" is checked
//!
//! [`apply_preset`] replays a preset through these same entry points instead
//! of writing the state directly.

pub mod constraints;
pub mod presets;

pub use constraints::{
    ConstraintError, MAX_PRIMARY_STATS, Toggle, set_armor_type_active, set_aux_flag,
    set_match_any, set_mode, set_numeric_input, set_realm, set_scan_mode, set_slot_active,
    set_threshold_input, toggle_armor_type, toggle_max_stat, toggle_primary_stat, toggle_slot,
};
pub use presets::{PresetOutcome, apply_preset, apply_record};
