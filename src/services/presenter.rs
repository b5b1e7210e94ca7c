//! Result sort/format pipeline.
//!
//! Turns fetched [`ResultRow`]s into display rows. The two numeric columns
//! carry their sort key next to the decorated text; the key is never parsed
//! back out of the text.

use crate::models::ResultRow;
use std::fmt;

/// Shown in place of any missing text field.
pub const PLACEHOLDER: &str = "—";

/// Wraps a max-stat descriptor in the display text.
pub const HIGHLIGHT_MARKER: &str = "**";

/// Currency suffix of the buyout column.
pub const GOLD_SUFFIX: &str = "g";

/// Display text plus the integer it sorts by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortableCell {
    pub text: String,
    pub sort_key: i64,
}

impl fmt::Display for SortableCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One stat descriptor column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatCell {
    Plain(String),
    /// Descriptor carrying the "maximum stat" prefix
    Highlighted(String),
    Missing,
}

impl StatCell {
    pub fn from_descriptor(descriptor: Option<&str>) -> Self {
        match descriptor {
            None => StatCell::Missing,
            Some(text) if is_max_descriptor(text) => StatCell::Highlighted(text.to_string()),
            Some(text) => StatCell::Plain(text.to_string()),
        }
    }

    pub fn is_highlighted(&self) -> bool {
        matches!(self, StatCell::Highlighted(_))
    }
}

impl fmt::Display for StatCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatCell::Plain(text) => f.write_str(text),
            StatCell::Highlighted(text) => {
                write!(f, "{}{}{}", HIGHLIGHT_MARKER, text, HIGHLIGHT_MARKER)
            }
            StatCell::Missing => f.write_str(PLACEHOLDER),
        }
    }
}

// "Max-Haste", "Max Haste" and "max: Haste" are max descriptors; "Mastery" is not.
fn is_max_descriptor(text: &str) -> bool {
    let trimmed = text.trim_start();
    match trimmed.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("max") => trimmed[3..]
            .chars()
            .next()
            .is_some_and(|c| !c.is_alphanumeric()),
        _ => false,
    }
}

/// A presented row, one cell per table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub realm: String,
    pub item_id: String,
    pub item_type: String,
    pub slot: String,
    pub stat1: StatCell,
    pub stat2: StatCell,
    pub name: String,
    pub item_level: SortableCell,
    pub buyout: SortableCell,
}

impl DisplayRow {
    pub fn from_row(row: &ResultRow) -> Self {
        let text = |field: &Option<String>| {
            field
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };

        Self {
            realm: text(&row.realm),
            item_id: text(&row.item_id),
            item_type: text(&row.item_type),
            slot: text(&row.slot),
            stat1: StatCell::from_descriptor(row.stat1.as_deref()),
            stat2: StatCell::from_descriptor(row.stat2.as_deref()),
            name: text(&row.name),
            item_level: SortableCell {
                text: row.ilvl.to_string(),
                sort_key: row.ilvl,
            },
            buyout: SortableCell {
                text: format_gold(row.buyout_gold),
                sort_key: row.buyout_gold,
            },
        }
    }

    pub fn sort_key(&self, column: SortColumn) -> i64 {
        match column {
            SortColumn::ItemLevel => self.item_level.sort_key,
            SortColumn::Buyout => self.buyout.sort_key,
        }
    }
}

/// Format a gold amount with thousands separators: `15,000g`.
pub fn format_gold(gold: i64) -> String {
    let digits = gold.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if gold < 0 { "-" } else { "" };
    format!("{}{}{}", sign, grouped, GOLD_SUFFIX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    ItemLevel,
    Buyout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The displayed result set.
///
/// Rows are kept in arrival order; sorting only reorders a view index, and the
/// sort is stable so equal keys keep their arrival order.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    rows: Vec<DisplayRow>,
    order: Vec<usize>,
    sort: Option<(SortColumn, SortDirection)>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole displayed set with `rows`. The active sort, if any,
    /// is re-applied. Returns the number of rows now shown.
    pub fn present(&mut self, rows: &[ResultRow]) -> usize {
        self.rows = rows.iter().map(DisplayRow::from_row).collect();
        self.order = (0..self.rows.len()).collect();
        self.apply_sort();

        tracing::debug!("Presented {} result rows", self.rows.len());
        self.rows.len()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.order.clear();
    }

    /// Click a sortable column header.
    ///
    /// The first click on a column sorts descending; clicking the same column
    /// again flips the direction.
    pub fn activate_sort(&mut self, column: SortColumn) -> SortDirection {
        let direction = match self.sort {
            Some((current, direction)) if current == column => direction.flipped(),
            _ => SortDirection::Descending,
        };

        self.sort = Some((column, direction));
        self.apply_sort();
        direction
    }

    pub fn sort_state(&self) -> Option<(SortColumn, SortDirection)> {
        self.sort
    }

    fn apply_sort(&mut self) {
        let Some((column, direction)) = self.sort else {
            return;
        };

        let rows = &self.rows;
        // Reset to arrival order first so ties resolve by input position.
        self.order = (0..rows.len()).collect();
        self.order.sort_by(|&a, &b| {
            let ordering = rows[a].sort_key(column).cmp(&rows[b].sort_key(column));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    /// Rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = &DisplayRow> {
        self.order.iter().map(|&i| &self.rows[i])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
