use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Secondary stats a user can filter on.
///
/// Ordering follows the on-screen checkbox order, which is also the order in
/// which compiled filter tokens are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    Haste,
    Crit,
    Vers,
    Mastery,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Haste, Stat::Crit, Stat::Vers, Stat::Mastery];

    /// Display name, also used as the filter token.
    pub fn name(self) -> &'static str {
        match self {
            Stat::Haste => "Haste",
            Stat::Crit => "Crit",
            Stat::Vers => "Vers",
            Stat::Mastery => "Mastery",
        }
    }

    /// Identifier of the primary-stat checkbox (`haste`).
    pub fn checkbox_id(self) -> &'static str {
        match self {
            Stat::Haste => "haste",
            Stat::Crit => "crit",
            Stat::Vers => "vers",
            Stat::Mastery => "mastery",
        }
    }

    /// Filter token for the "maximum of this stat" preference (`Max-Haste`).
    pub fn max_token(self) -> String {
        format!("Max-{}", self.name())
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stat::ALL
            .into_iter()
            .find(|stat| stat.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown stat: {}", s))
    }
}

/// Binary filters that exist in both stat modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxFlag {
    /// Movement speed tertiary stat
    Speed,
    /// Prismatic socket
    Prismatic,
}

impl AuxFlag {
    pub fn token(self) -> &'static str {
        match self {
            AuxFlag::Speed => "Speed",
            AuxFlag::Prismatic => "Prismatic",
        }
    }
}

/// How stat intent is expressed in a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatMode {
    /// Discrete stat identifiers
    #[default]
    Normal,
    /// Per-stat numeric thresholds
    Advanced,
}

/// Which realms the scan service should visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanMode {
    #[default]
    #[serde(rename = "all")]
    AllRealms,
    #[serde(rename = "single")]
    SingleRealm,
}

/// Free-text numeric fields of the scan form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    MinIlvl,
    MaxIlvl,
    MaxBuyout,
}

/// Raw UI selection behind the scan form.
///
/// This is a plain container. Every mutation goes through [`crate::engine`],
/// which keeps the stat invariants intact:
/// - at most [`crate::engine::MAX_PRIMARY_STATS`] primary stats
/// - at most one max stat
/// - [`match_any_stats`](Self::match_any_stats) is derived on read, never stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub(crate) active_slots: IndexSet<String>,
    pub(crate) active_armor_types: IndexSet<String>,
    pub(crate) primary_stats: BTreeSet<Stat>,
    pub(crate) max_stat: Option<Stat>,

    /// Set when "All Stats" is unchecked while nothing is selected yet, so the
    /// stat checkboxes become reachable. Cleared by the next accepted stat toggle.
    pub(crate) stat_controls_unlocked: bool,

    pub(crate) speed: bool,
    pub(crate) prismatic: bool,

    pub(crate) stat_mode: StatMode,
    pub(crate) scan_mode: ScanMode,
    pub(crate) realm: String,

    pub(crate) min_ilvl: String,
    pub(crate) max_ilvl: String,
    pub(crate) max_buyout: String,
    pub(crate) threshold_inputs: BTreeMap<Stat, String>,
}

impl SelectionState {
    pub fn active_slots(&self) -> &IndexSet<String> {
        &self.active_slots
    }

    pub fn active_armor_types(&self) -> &IndexSet<String> {
        &self.active_armor_types
    }

    pub fn primary_stats(&self) -> &BTreeSet<Stat> {
        &self.primary_stats
    }

    pub fn max_stat(&self) -> Option<Stat> {
        self.max_stat
    }

    /// No stat filtering: no primary stat and no max stat selected.
    pub fn match_any_stats(&self) -> bool {
        self.primary_stats.is_empty() && self.max_stat.is_none()
    }

    /// Whether the primary and max stat checkboxes accept direct interaction.
    pub fn stat_controls_enabled(&self) -> bool {
        !self.match_any_stats() || self.stat_controls_unlocked
    }

    /// State of the "All Stats" checkbox.
    ///
    /// Equal to [`match_any_stats`](Self::match_any_stats) except in the
    /// transient state where the user has unchecked it but not picked a stat yet.
    pub fn all_stats_checked(&self) -> bool {
        !self.stat_controls_enabled()
    }

    pub fn aux_flag(&self, flag: AuxFlag) -> bool {
        match flag {
            AuxFlag::Speed => self.speed,
            AuxFlag::Prismatic => self.prismatic,
        }
    }

    pub fn stat_mode(&self) -> StatMode {
        self.stat_mode
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.scan_mode
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn numeric_input(&self, field: NumericField) -> &str {
        match field {
            NumericField::MinIlvl => &self.min_ilvl,
            NumericField::MaxIlvl => &self.max_ilvl,
            NumericField::MaxBuyout => &self.max_buyout,
        }
    }

    /// Raw Advanced-mode threshold text for a stat, empty when never typed.
    pub fn threshold_input(&self, stat: Stat) -> &str {
        self.threshold_inputs
            .get(&stat)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub(crate) fn numeric_input_mut(&mut self, field: NumericField) -> &mut String {
        match field {
            NumericField::MinIlvl => &mut self.min_ilvl,
            NumericField::MaxIlvl => &mut self.max_ilvl,
            NumericField::MaxBuyout => &mut self.max_buyout,
        }
    }

    pub(crate) fn aux_flag_mut(&mut self, flag: AuxFlag) -> &mut bool {
        match flag {
            AuxFlag::Speed => &mut self.speed,
            AuxFlag::Prismatic => &mut self.prismatic,
        }
    }
}
