//! Integration tests for SelectionManager and the constraint engine
//!
//! These tests verify that:
//! - The two-stat cap rejects instead of evicting
//! - The match-anything state always mirrors the stat selection
//! - Presets replay through the engine and are idempotent
//! - Change events reach every subscriber

use gearscan::engine::{ConstraintError, PresetOutcome};
use gearscan::models::{
    AuxFlag, NumericField, PresetTable, ScanMode, Stat, StatMode, UnknownPresetPolicy,
};
use gearscan::{SelectionChange, SelectionManager};
use proptest::prelude::*;
use std::sync::Arc;
use tokio::time::{Duration, timeout};

#[test]
fn test_third_stat_rejected() {
    let selection = SelectionManager::new();
    selection.set_match_any(false);

    selection.toggle_primary_stat(Stat::Haste).unwrap();
    selection.toggle_primary_stat(Stat::Crit).unwrap();

    let mut rx = selection.subscribe();
    let err = selection.toggle_primary_stat(Stat::Vers).unwrap_err();

    assert_eq!(err, ConstraintError::TooManyPrimaryStats { limit: 2 });
    assert_eq!(err.to_string(), "You can select up to 2 stats.");

    let state = selection.snapshot();
    assert_eq!(
        state.primary_stats().iter().copied().collect::<Vec<_>>(),
        vec![Stat::Haste, Stat::Crit]
    );
    assert!(!state.match_any_stats());

    assert_eq!(
        rx.try_recv().unwrap(),
        SelectionChange::Warning {
            message: "You can select up to 2 stats.".to_string()
        }
    );
}

#[test]
fn test_stat_controls_locked_by_default() {
    let selection = SelectionManager::new();

    assert!(selection.read(|s| s.all_stats_checked()));
    assert_eq!(
        selection.toggle_max_stat(Stat::Mastery).unwrap_err(),
        ConstraintError::StatControlsLocked
    );
    assert!(selection.read(|s| s.max_stat().is_none()));
}

#[test]
fn test_match_any_clears_selection() {
    let selection = SelectionManager::new();
    selection.set_match_any(false);
    selection.toggle_primary_stat(Stat::Vers).unwrap();
    selection.toggle_max_stat(Stat::Crit).unwrap();

    selection.set_match_any(true);

    let state = selection.snapshot();
    assert!(state.primary_stats().is_empty());
    assert!(state.max_stat().is_none());
    assert!(state.match_any_stats());
    assert!(!state.stat_controls_enabled());
}

#[test]
fn test_max_stat_single_choice() {
    let selection = SelectionManager::new();
    selection.set_match_any(false);

    selection.toggle_max_stat(Stat::Haste).unwrap();
    selection.toggle_max_stat(Stat::Mastery).unwrap();
    assert_eq!(selection.read(|s| s.max_stat()), Some(Stat::Mastery));

    // Deselecting the last stat falls back to match-anything
    selection.toggle_max_stat(Stat::Mastery).unwrap();
    assert!(selection.read(|s| s.match_any_stats() && s.all_stats_checked()));
}

#[test]
fn test_mode_switch_keeps_selections() {
    let selection = SelectionManager::new();
    selection.set_match_any(false);
    selection.toggle_primary_stat(Stat::Haste).unwrap();
    selection.set_threshold_input(Stat::Crit, "40");

    selection.set_mode(StatMode::Advanced);
    selection.set_mode(StatMode::Normal);

    let state = selection.snapshot();
    assert!(state.primary_stats().contains(&Stat::Haste));
    assert_eq!(state.threshold_input(Stat::Crit), "40");
}

#[test]
fn test_preset_idempotent() {
    let table = PresetTable::builtin();

    for name in ["full", "custom", "profitable"] {
        let selection = SelectionManager::new();
        selection
            .apply_preset(&table, name, UnknownPresetPolicy::Ignore)
            .unwrap();
        let once = selection.snapshot();

        selection
            .apply_preset(&table, name, UnknownPresetPolicy::Ignore)
            .unwrap();
        assert_eq!(selection.snapshot(), once, "preset {} not idempotent", name);
    }
}

#[test]
fn test_preset_replaces_prior_selection() {
    let table = PresetTable::builtin();
    let selection = SelectionManager::new();

    selection
        .apply_preset(&table, "custom", UnknownPresetPolicy::Ignore)
        .unwrap();
    selection.toggle_slot("Neck");
    selection.set_numeric_input(NumericField::MaxBuyout, "123");

    selection
        .apply_preset(&table, "profitable", UnknownPresetPolicy::Ignore)
        .unwrap();

    let state = selection.snapshot();
    assert!(!state.active_slots().contains("Neck"));
    assert!(state.match_any_stats());
    assert_eq!(state.numeric_input(NumericField::MaxBuyout), "2000");
    assert_eq!(state.numeric_input(NumericField::MinIlvl), "580");
}

#[test]
fn test_unknown_preset_policies() {
    let table = PresetTable::builtin();
    let selection = SelectionManager::new();
    selection.set_scan_mode(ScanMode::SingleRealm);
    let before = selection.snapshot();

    let (outcome, changes) = selection
        .apply_preset(&table, "does-not-exist", UnknownPresetPolicy::Ignore)
        .unwrap();
    assert_eq!(outcome, PresetOutcome::Ignored);
    assert!(changes.is_empty());
    assert_eq!(selection.snapshot(), before);

    assert!(
        selection
            .apply_preset(&table, "does-not-exist", UnknownPresetPolicy::Reject)
            .is_err()
    );
    assert_eq!(selection.snapshot(), before);
}

#[tokio::test]
async fn test_multiple_subscribers_receive_events() {
    let selection = Arc::new(SelectionManager::new());
    let mut rx1 = selection.subscribe();
    let mut rx2 = selection.subscribe();

    selection.toggle_slot("Waist");

    for rx in [&mut rx1, &mut rx2] {
        let event = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("Timeout waiting for event")
            .expect("Channel closed");
        assert_eq!(event, SelectionChange::SlotsChanged { active: 1 });
    }
}

#[test]
fn test_concurrent_toggles_respect_cap() {
    let selection = Arc::new(SelectionManager::new());
    selection.set_match_any(false);
    selection.toggle_primary_stat(Stat::Haste).unwrap();

    let handles: Vec<_> = [Stat::Crit, Stat::Vers, Stat::Mastery]
        .into_iter()
        .map(|stat| {
            let selection = Arc::clone(&selection);
            std::thread::spawn(move || selection.toggle_primary_stat(stat).is_ok())
        })
        .collect();

    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(accepted, 1);
    assert_eq!(selection.read(|s| s.primary_stats().len()), 2);
}

#[derive(Debug, Clone)]
enum Action {
    TogglePrimary(Stat),
    ToggleMax(Stat),
    MatchAny(bool),
    Mode(StatMode),
    Aux(AuxFlag, bool),
    Preset(&'static str),
}

fn stat() -> impl Strategy<Value = Stat> {
    prop::sample::select(Stat::ALL.to_vec())
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        stat().prop_map(Action::TogglePrimary),
        stat().prop_map(Action::ToggleMax),
        any::<bool>().prop_map(Action::MatchAny),
        prop::sample::select(vec![StatMode::Normal, StatMode::Advanced]).prop_map(Action::Mode),
        (
            prop::sample::select(vec![AuxFlag::Speed, AuxFlag::Prismatic]),
            any::<bool>()
        )
            .prop_map(|(flag, on)| Action::Aux(flag, on)),
        prop::sample::select(vec!["full", "custom", "profitable", "missing"])
            .prop_map(Action::Preset),
    ]
}

proptest! {
    #[test]
    fn prop_stat_invariants_hold(actions in prop::collection::vec(action(), 0..40)) {
        let table = PresetTable::builtin();
        let selection = SelectionManager::new();

        for action in actions {
            let before = selection.snapshot();
            let rejected = match action {
                Action::TogglePrimary(stat) => selection.toggle_primary_stat(stat).is_err(),
                Action::ToggleMax(stat) => selection.toggle_max_stat(stat).is_err(),
                Action::MatchAny(on) => {
                    selection.set_match_any(on);
                    false
                }
                Action::Mode(mode) => {
                    selection.set_mode(mode);
                    false
                }
                Action::Aux(flag, on) => {
                    selection.set_aux_flag(flag, on);
                    false
                }
                Action::Preset(name) => selection
                    .apply_preset(&table, name, UnknownPresetPolicy::Ignore)
                    .is_err(),
            };

            let state = selection.snapshot();
            if rejected {
                prop_assert_eq!(&state, &before);
            }

            prop_assert!(state.primary_stats().len() <= 2);
            prop_assert_eq!(
                state.match_any_stats(),
                state.primary_stats().is_empty() && state.max_stat().is_none()
            );
            // Checked "All Stats" always means nothing is selected
            if state.all_stats_checked() {
                prop_assert!(state.match_any_stats());
            }
            if !state.match_any_stats() {
                prop_assert!(state.stat_controls_enabled());
            }
            // Nothing selected in Normal mode means no stat filtering at all
            if state.match_any_stats() && state.stat_mode() == StatMode::Normal {
                prop_assert!(selection.compile().filter_tokens.is_empty());
            }
        }
    }
}
