//! Scan request compiler.
//!
//! [`compile`] is a pure function of the selection: the same selection always
//! produces the same request, and nothing is mutated.

use crate::models::catalog::{ALL_WEAPON_TYPES, SlotCategories};
use crate::models::numeric::{parse_leading_int, parse_positive};
use crate::models::request::{
    DEFAULT_MAX_BUYOUT, DEFAULT_MAX_ILVL, DEFAULT_MIN_ILVL, SPEED_THRESHOLD,
};
use crate::models::{
    AuxFlag, NumericField, ScanMode, ScanRequest, SelectionState, Stat, StatMode, StatThresholds,
};

/// Active slots split into the three category lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotClassification {
    pub armor: Vec<String>,
    pub weapon: Vec<String>,
    pub accessory: Vec<String>,
}

/// Snapshot a selection into a scan request.
pub fn compile(state: &SelectionState) -> ScanRequest {
    let slots = classify_slots(state.active_slots());

    let realm = match state.scan_mode() {
        // An empty realm is passed on; the scan service reports it.
        ScanMode::SingleRealm => Some(state.realm().trim().to_string()),
        ScanMode::AllRealms => None,
    };

    let thresholds = match state.stat_mode() {
        StatMode::Normal => None,
        StatMode::Advanced => Some(compile_thresholds(state)),
    };

    ScanRequest {
        min_ilvl: compile_min_ilvl(state.numeric_input(NumericField::MinIlvl)),
        max_ilvl: compile_max_ilvl(state.numeric_input(NumericField::MaxIlvl)),
        max_buyout: compile_max_buyout(state.numeric_input(NumericField::MaxBuyout)),
        armor_slots: slots.armor,
        weapon_slots: slots.weapon,
        accessory_slots: slots.accessory,
        armor_types: state.active_armor_types().iter().cloned().collect(),
        weapon_types: ALL_WEAPON_TYPES.iter().map(|s| s.to_string()).collect(),
        filter_tokens: compile_filter_tokens(state),
        thresholds,
        slots: state.active_slots().iter().cloned().collect(),
        stat_mode: state.stat_mode(),
        scan_mode: state.scan_mode(),
        realm,
    }
}

/// Place each slot in every category table it belongs to. Slots in no table
/// are dropped.
pub fn classify_slots<'a, I>(slots: I) -> SlotClassification
where
    I: IntoIterator<Item = &'a String>,
{
    let mut classification = SlotClassification::default();

    for slot in slots {
        let categories = SlotCategories::of(slot);
        if categories.is_unknown() {
            tracing::debug!("Dropping slot '{}': not in any category table", slot);
            continue;
        }
        if categories.armor {
            classification.armor.push(slot.clone());
        }
        if categories.weapon {
            classification.weapon.push(slot.clone());
        }
        if categories.accessory {
            classification.accessory.push(slot.clone());
        }
    }

    classification
}

// Item levels are positive; zero counts as blank, as in the form it comes from.
fn compile_min_ilvl(text: &str) -> i64 {
    parse_leading_int(text)
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_MIN_ILVL)
}

fn compile_max_ilvl(text: &str) -> i64 {
    parse_leading_int(text)
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_MAX_ILVL)
}

fn compile_max_buyout(text: &str) -> u64 {
    parse_positive(text).unwrap_or(DEFAULT_MAX_BUYOUT)
}

/// Filter tokens for the active mode.
///
/// Normal mode: checked primary stats, then the max stat, then aux flags,
/// unless no stat is selected, which sends no tokens at all.
/// Advanced mode: aux flags only; thresholds carry the stat intent.
pub fn compile_filter_tokens(state: &SelectionState) -> Vec<String> {
    let mut tokens = Vec::new();

    match state.stat_mode() {
        StatMode::Normal => {
            if state.match_any_stats() {
                return tokens;
            }
            tokens.extend(state.primary_stats().iter().map(|stat| stat.name().to_string()));
            if let Some(stat) = state.max_stat() {
                tokens.push(stat.max_token());
            }
        }
        StatMode::Advanced => {}
    }

    for flag in [AuxFlag::Speed, AuxFlag::Prismatic] {
        if state.aux_flag(flag) {
            tokens.push(flag.token().to_string());
        }
    }

    tokens
}

/// Advanced-mode thresholds. Blank or invalid inputs compile to 0.
pub fn compile_thresholds(state: &SelectionState) -> StatThresholds {
    let mut thresholds = StatThresholds::default();

    for stat in Stat::ALL {
        let value = parse_leading_int(state.threshold_input(stat))
            .filter(|v| *v > 0)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0);
        thresholds.set(stat, value);
    }

    thresholds.speed = if state.aux_flag(AuxFlag::Speed) {
        SPEED_THRESHOLD
    } else {
        0
    };

    thresholds
}
