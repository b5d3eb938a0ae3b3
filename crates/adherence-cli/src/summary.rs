use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!(
        "Input: {} ({} rows, {} in window)",
        result.input.display(),
        result.rows_read,
        result.rows_in_window
    );
    println!("Patients: {}", result.patients);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Flag"),
        header_cell("Min streak"),
        header_cell("Patients"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for flag in &result.flagged {
        table.add_row(vec![
            Cell::new(&flag.label),
            Cell::new(flag.min_streak),
            Cell::new(flag.patients),
        ]);
    }
    println!("{table}");

    if result.written {
        println!("Output: {}", result.output.display());
    } else {
        println!("Output: skipped (dry run)");
    }
    println!("Elapsed: {:.2?}", result.elapsed);
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
