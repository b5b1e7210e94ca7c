//! Fixed slot and item-type catalogs.
//!
//! These tables are hand-maintained to match the slot labels the scan service
//! reports. A slot may belong to more than one table: `Held In Off-hand` is both
//! a weapon location and an accessory location.

/// Equipment slots that carry an armor type.
pub const ARMOR_SLOTS: &[&str] = &[
    "Head", "Shoulder", "Chest", "Waist", "Legs", "Feet", "Back", "Wrist", "Hands",
];

/// Equipment slots that hold a weapon.
pub const WEAPON_SLOTS: &[&str] = &[
    "One-Hand",
    "Two-Hand",
    "Main-Hand",
    "Off-Hand",
    "Held In Off-hand",
    "Ranged",
    "Ranged Right",
];

/// Jewelry and held-item slots.
pub const ACCESSORY_SLOTS: &[&str] = &["Finger", "Trinket", "Neck", "Held In Off-hand"];

/// Armor types offered as toggle buttons.
pub const ARMOR_TYPES: &[&str] = &["Cloth", "Leather", "Mail", "Plate", "Miscellaneous"];

/// Every weapon type the scanner knows about.
///
/// Weapon type is not user-filterable, so every compiled request carries this
/// whole list.
pub const ALL_WEAPON_TYPES: &[&str] = &[
    "Dagger",
    "Sword",
    "Axe",
    "Mace",
    "Fist Weapon",
    "Polearm",
    "Staff",
    "Off-Hand",
    "Warglaives",
    "Gun",
    "Bow",
    "Crossbow",
    "Thrown",
    "Shield",
    "Wand",
    "Off Hand",
    "Ranged Right",
];

/// Which category tables a slot belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotCategories {
    pub armor: bool,
    pub weapon: bool,
    pub accessory: bool,
}

impl SlotCategories {
    /// Look up a slot label against all three tables.
    pub fn of(slot: &str) -> Self {
        Self {
            armor: ARMOR_SLOTS.contains(&slot),
            weapon: WEAPON_SLOTS.contains(&slot),
            accessory: ACCESSORY_SLOTS.contains(&slot),
        }
    }

    /// True when the slot is in none of the tables.
    pub fn is_unknown(&self) -> bool {
        !(self.armor || self.weapon || self.accessory)
    }
}
