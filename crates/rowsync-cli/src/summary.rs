//! End-of-run summary rendering.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rowsync_model::RunSummary;

/// Prints the mandatory per-outcome count table plus individual failures,
/// so operators can locate and re-submit specific records.
pub fn print_summary(summary: &RunSummary) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Outcome"), header_cell("Rows")]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("Created"), count_cell(summary.created, Color::Green)]);
    table.add_row(vec![Cell::new("Updated"), count_cell(summary.updated, Color::Green)]);
    table.add_row(vec![
        Cell::new("Unchanged"),
        count_cell(summary.skipped_unchanged, Color::Blue),
    ]);
    table.add_row(vec![
        Cell::new("Invalid"),
        count_cell(summary.skipped_invalid, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Excluded"),
        count_cell(summary.excluded, Color::DarkGrey),
    ]);
    table.add_row(vec![Cell::new("Failed"), count_cell(summary.failed, Color::Red)]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.total()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if !summary.failures.is_empty() {
        eprintln!("Failures:");
        for failure in &summary.failures {
            let identity = if failure.identity.is_empty() {
                "<no identity>"
            } else {
                failure.identity.as_str()
            };
            eprintln!("- row {} ({identity}): {}", failure.row, failure.reason);
        }
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}
