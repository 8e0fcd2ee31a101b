use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use userload_cli::pipeline::RunReport;

pub fn print_summary(report: &RunReport) {
    println!("Source: {}", report.source.display());
    if report.dry_run {
        println!("Mode: dry run (no rows written)");
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Outcome"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let counts = &report.counts;
    table.add_row(vec![
        Cell::new("Inserted").fg(Color::Green),
        count_cell(counts.inserted, Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Skipped (duplicate)"),
        count_cell(counts.duplicate, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Skipped (invalid)"),
        count_cell(counts.invalid, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Skipped (malformed)"),
        count_cell(counts.malformed, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Failed"),
        count_cell(counts.failed, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.processed()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(60);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
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
