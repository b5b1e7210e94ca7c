use super::catalog::{ALL_WEAPON_TYPES, ARMOR_TYPES};
use super::selection::Stat;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or applying presets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    #[error("Unknown preset: {0}")]
    Unknown(String),

    #[error("Preset '{name}' is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

/// What to do when a preset name is not in the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPresetPolicy {
    /// Leave the selection untouched and report nothing
    #[default]
    Ignore,
    /// Report [`PresetError::Unknown`]
    Reject,
}

/// One named filter template.
///
/// Field names follow the form control identifiers, so a presets file reads
/// like the form it fills in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetRecord {
    #[serde(default)]
    pub haste: bool,
    #[serde(default)]
    pub crit: bool,
    #[serde(default)]
    pub vers: bool,
    #[serde(default)]
    pub mastery: bool,

    #[serde(rename = "max-haste", default)]
    pub max_haste: bool,
    #[serde(rename = "max-crit", default)]
    pub max_crit: bool,
    #[serde(rename = "max-vers", default)]
    pub max_vers: bool,
    #[serde(rename = "max-mastery", default)]
    pub max_mastery: bool,

    #[serde(default)]
    pub speed: bool,
    #[serde(default)]
    pub prismatic: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_ilvl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ilvl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_buyout: Option<u64>,

    #[serde(default)]
    pub slots: Vec<String>,
    #[serde(default)]
    pub armor_types: Vec<String>,

    /// Informational only; weapon type is not user-filterable.
    #[serde(default)]
    pub weapon_types: Vec<String>,
}

impl PresetRecord {
    /// Primary stats flagged on, in checkbox order.
    pub fn primary_stats(&self) -> Vec<Stat> {
        let flags = [self.haste, self.crit, self.vers, self.mastery];
        Stat::ALL
            .into_iter()
            .zip(flags)
            .filter_map(|(stat, on)| on.then_some(stat))
            .collect()
    }

    /// Max stats flagged on, in checkbox order.
    pub fn max_stats(&self) -> Vec<Stat> {
        let flags = [
            self.max_haste,
            self.max_crit,
            self.max_vers,
            self.max_mastery,
        ];
        Stat::ALL
            .into_iter()
            .zip(flags)
            .filter_map(|(stat, on)| on.then_some(stat))
            .collect()
    }

    /// The single max stat, if any. Only meaningful on validated records.
    pub fn max_stat(&self) -> Option<Stat> {
        self.max_stats().first().copied()
    }

    fn validate(&self, name: &str) -> Result<(), PresetError> {
        let invalid = |reason: String| PresetError::Invalid {
            name: name.to_string(),
            reason,
        };

        let primaries = self.primary_stats();
        if primaries.len() > crate::engine::MAX_PRIMARY_STATS {
            return Err(invalid(format!(
                "{} primary stats flagged, at most {} allowed",
                primaries.len(),
                crate::engine::MAX_PRIMARY_STATS
            )));
        }

        let maxes = self.max_stats();
        if maxes.len() > 1 {
            return Err(invalid(format!(
                "{} max stats flagged, at most 1 allowed",
                maxes.len()
            )));
        }

        Ok(())
    }
}

/// Immutable table of named presets, loaded once at startup.
///
/// Share it behind an `Arc`; there is no mutation path after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetTable {
    presets: IndexMap<String, PresetRecord>,
}

impl PresetTable {
    /// Build a table, rejecting records that could never be reproduced by
    /// manual interaction (too many primary stats, several max stats).
    pub fn new(presets: IndexMap<String, PresetRecord>) -> Result<Self, PresetError> {
        for (name, record) in &presets {
            record.validate(name)?;
        }
        Ok(Self { presets })
    }

    /// The `full`, `custom` and `profitable` presets shipped with the scanner.
    pub fn builtin() -> Self {
        Self {
            presets: builtin_presets(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PresetRecord> {
        self.presets.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// The records keyed by name, for persisting.
    pub fn records(&self) -> &IndexMap<String, PresetRecord> {
        &self.presets
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_presets() -> IndexMap<String, PresetRecord> {
    let mut presets = IndexMap::new();

    presets.insert(
        "full".to_string(),
        PresetRecord {
            speed: true,
            prismatic: true,
            min_ilvl: Some(1),
            max_ilvl: Some(1000),
            max_buyout: Some(10_000_000),
            slots: strings(&[
                "Head",
                "Chest",
                "Shoulder",
                "Waist",
                "Legs",
                "Wrist",
                "Hands",
                "Back",
                "Feet",
                "One-Hand",
                "Two-Hand",
                "Main-Hand",
                "Held In Off-hand",
                "Off-Hand",
                "Off Hand",
                "Ranged",
                "Ranged Right",
                "Finger",
                "Trinket",
                "Held In Off-hand",
                "Neck",
            ]),
            armor_types: strings(ARMOR_TYPES),
            weapon_types: strings(ALL_WEAPON_TYPES),
            ..PresetRecord::default()
        },
    );

    presets.insert(
        "custom".to_string(),
        PresetRecord {
            haste: true,
            max_haste: true,
            speed: true,
            prismatic: true,
            min_ilvl: Some(320),
            max_ilvl: Some(357),
            max_buyout: Some(10_000_000),
            slots: strings(&[
                "Waist",
                "Legs",
                "Wrist",
                "Hands",
                "Back",
                "Feet",
                "One-Hand",
                "Two-Hand",
                "Main-Hand",
                "Off-Hand",
                "Finger",
                "Trinket",
                "Held In Off-hand",
            ]),
            armor_types: strings(&["Cloth", "Leather", "Miscellaneous"]),
            weapon_types: strings(&[
                "Dagger",
                "Mace",
                "Fist Weapon",
                "Polearm",
                "Staff",
                "Off Hand",
            ]),
            ..PresetRecord::default()
        },
    );

    presets.insert(
        "profitable".to_string(),
        PresetRecord {
            speed: true,
            prismatic: true,
            min_ilvl: Some(580),
            max_ilvl: Some(1000),
            max_buyout: Some(2000),
            slots: strings(&[
                "Waist",
                "Legs",
                "Wrist",
                "Hands",
                "Back",
                "One-Hand",
                "Two-Hand",
                "Main-Hand",
                "Held In Off-hand",
                "Off-Hand",
                "Off Hand",
                "Ranged",
                "Ranged Right",
                "Finger",
                "Trinket",
                "Held In Off-hand",
            ]),
            armor_types: strings(ARMOR_TYPES),
            weapon_types: strings(ALL_WEAPON_TYPES),
            ..PresetRecord::default()
        },
    );

    presets
}
