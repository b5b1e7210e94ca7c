// Terminal rendering of the result table

use crate::services::ResultTable;
use crate::services::presenter::DisplayRow;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Table};

/// Column headers in display order.
pub const HEADERS: [&str; 9] = [
    "Realm", "Item ID", "Type", "Slot", "Stat 1", "Stat 2", "Name", "iLvl", "Buyout",
];

const ITEM_LEVEL_COLUMN: usize = 7;
const BUYOUT_COLUMN: usize = 8;

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn row_cells(row: &DisplayRow) -> Vec<Cell> {
    let stat_cell = |text: String, highlighted: bool| {
        let cell = Cell::new(text);
        if highlighted {
            cell.add_attribute(Attribute::Bold)
        } else {
            cell
        }
    };

    vec![
        Cell::new(&row.realm),
        Cell::new(&row.item_id),
        Cell::new(&row.item_type),
        Cell::new(&row.slot),
        stat_cell(row.stat1.to_string(), row.stat1.is_highlighted()),
        stat_cell(row.stat2.to_string(), row.stat2.is_highlighted()),
        Cell::new(&row.name),
        Cell::new(&row.item_level),
        Cell::new(&row.buyout),
    ]
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// Build the table in its current display order.
pub fn build_table(results: &ResultTable) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(HEADERS.iter().map(|h| header_cell(h)).collect::<Vec<_>>());

    for row in results.rows() {
        table.add_row(row_cells(row));
    }

    align_column(&mut table, ITEM_LEVEL_COLUMN, CellAlignment::Right);
    align_column(&mut table, BUYOUT_COLUMN, CellAlignment::Right);
    table
}

/// Render the table as text, one line per row plus header and borders.
///
/// An empty table renders as its header alone.
pub fn render_table(results: &ResultTable) -> String {
    format!("{}\n", build_table(results))
}
