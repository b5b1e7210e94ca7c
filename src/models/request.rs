use super::selection::{ScanMode, Stat, StatMode};
use serde::{Deserialize, Serialize};

/// Lower item-level bound used when the field is blank or invalid.
pub const DEFAULT_MIN_ILVL: i64 = 0;

/// Upper item-level bound used when the field is blank or invalid; no item
/// reaches it in practice.
pub const DEFAULT_MAX_ILVL: i64 = 1000;

/// Price ceiling, in whole gold, used when the field is blank or invalid.
pub const DEFAULT_MAX_BUYOUT: u64 = 10_000_000;

/// Threshold sent for Speed when the Speed flag is on in Advanced mode.
///
/// The scan service matches the speed tertiary by this fixed amount rather
/// than a user-entered number.
pub const SPEED_THRESHOLD: u32 = 71;

/// Per-stat minimum amounts for Advanced mode.
///
/// A value of 0 disables the threshold for that stat. A blank input also
/// compiles to 0, so the two are indistinguishable downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatThresholds {
    #[serde(rename = "Haste")]
    pub haste: u32,
    #[serde(rename = "Crit")]
    pub crit: u32,
    #[serde(rename = "Vers")]
    pub vers: u32,
    #[serde(rename = "Mastery")]
    pub mastery: u32,
    #[serde(rename = "Speed")]
    pub speed: u32,
}

impl StatThresholds {
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Haste => self.haste,
            Stat::Crit => self.crit,
            Stat::Vers => self.vers,
            Stat::Mastery => self.mastery,
        }
    }

    pub(crate) fn set(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Haste => self.haste = value,
            Stat::Crit => self.crit = value,
            Stat::Vers => self.vers = value,
            Stat::Mastery => self.mastery = value,
        }
    }
}

/// Normalized scan description sent to the scan service.
///
/// Built fresh for every submit by [`crate::services::compiler::compile`] and
/// never modified afterwards. Serializes to the flat record the service reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    #[serde(rename = "MIN_ILVL")]
    pub min_ilvl: i64,

    #[serde(rename = "MAX_ILVL")]
    pub max_ilvl: i64,

    /// Whole gold, not copper.
    #[serde(rename = "MAX_BUYOUT")]
    pub max_buyout: u64,

    #[serde(rename = "ALLOWED_ARMOR_SLOTS")]
    pub armor_slots: Vec<String>,

    #[serde(rename = "ALLOWED_WEAPON_SLOTS")]
    pub weapon_slots: Vec<String>,

    #[serde(rename = "ALLOWED_ACCESSORY_SLOTS")]
    pub accessory_slots: Vec<String>,

    #[serde(rename = "ALLOWED_ARMOR_TYPES")]
    pub armor_types: Vec<String>,

    #[serde(rename = "ALLOWED_WEAPON_TYPES")]
    pub weapon_types: Vec<String>,

    /// Empty means "no stat filtering".
    #[serde(rename = "FILTER_TYPE")]
    pub filter_tokens: Vec<String>,

    /// Present only for Advanced mode.
    #[serde(
        rename = "STAT_DISTRIBUTION_THRESHOLDS",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub thresholds: Option<StatThresholds>,

    /// Every active slot as selected, before reclassification.
    pub slots: Vec<String>,

    pub stat_mode: StatMode,

    pub scan_mode: ScanMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
}

impl ScanRequest {
    /// True when no stat token restricts the scan.
    pub fn matches_any_stats(&self) -> bool {
        self.filter_tokens.is_empty()
    }
}
