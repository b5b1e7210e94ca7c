use super::constraints::{
    reset_filters, set_armor_type_active, set_aux_flag, set_match_any, set_numeric_input,
    set_slot_active, toggle_max_stat, toggle_primary_stat,
};
use crate::models::{
    AuxFlag, NumericField, PresetError, PresetRecord, PresetTable, SelectionState,
    UnknownPresetPolicy,
};

/// Result of an accepted [`apply_preset`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetOutcome {
    Applied,
    /// Name not found and the policy is [`UnknownPresetPolicy::Ignore`]
    Ignored,
}

/// Look up `name` and overwrite the selection with it.
pub fn apply_preset(
    state: &mut SelectionState,
    table: &PresetTable,
    name: &str,
    policy: UnknownPresetPolicy,
) -> Result<PresetOutcome, PresetError> {
    let Some(preset) = table.get(name) else {
        return match policy {
            UnknownPresetPolicy::Ignore => {
                tracing::debug!("Ignoring unknown preset '{}'", name);
                Ok(PresetOutcome::Ignored)
            }
            UnknownPresetPolicy::Reject => Err(PresetError::Unknown(name.to_string())),
        };
    };

    apply_record(state, preset);
    tracing::info!("Applied preset '{}'", name);
    Ok(PresetOutcome::Applied)
}

/// Reset the selection and replay a preset through the same entry points a
/// user would hit, so the derived stat state comes out identical.
///
/// The record is applied wholesale; nothing from the prior selection survives
/// except stat mode, scan target and Advanced thresholds.
pub fn apply_record(state: &mut SelectionState, preset: &PresetRecord) {
    reset_filters(state);

    let primaries = preset.primary_stats();
    let max_stat = preset.max_stat();

    if !primaries.is_empty() || max_stat.is_some() {
        // A user has to uncheck "All Stats" before picking any stat.
        set_match_any(state, false);
    }

    for stat in primaries {
        if let Err(e) = toggle_primary_stat(state, stat) {
            tracing::warn!("Preset stat {} not applied: {}", stat, e);
        }
    }

    if let Some(stat) = max_stat {
        if let Err(e) = toggle_max_stat(state, stat) {
            tracing::warn!("Preset max stat {} not applied: {}", stat, e);
        }
    }

    set_aux_flag(state, AuxFlag::Speed, preset.speed);
    set_aux_flag(state, AuxFlag::Prismatic, preset.prismatic);

    // Zero and missing both leave the field blank.
    let field_text = |value: Option<u64>| {
        value
            .filter(|v| *v != 0)
            .map(|v| v.to_string())
            .unwrap_or_default()
    };
    set_numeric_input(
        state,
        NumericField::MinIlvl,
        &field_text(preset.min_ilvl.map(u64::from)),
    );
    set_numeric_input(
        state,
        NumericField::MaxIlvl,
        &field_text(preset.max_ilvl.map(u64::from)),
    );
    set_numeric_input(state, NumericField::MaxBuyout, &field_text(preset.max_buyout));

    for slot in &preset.slots {
        set_slot_active(state, slot, true);
    }
    for armor_type in &preset.armor_types {
        set_armor_type_active(state, armor_type, true);
    }
}
