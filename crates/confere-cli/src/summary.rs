use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use confere_cli::pipeline::ColumnCheck;

use crate::types::ReconcileResult;

pub fn print_summary(result: &ReconcileResult) {
    print_column_checks(&result.column_checks);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Records"),
        header_cell("Conferidos"),
        header_cell("Erros"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let mut total_records = 0usize;
    let mut total_conferido = 0usize;
    let mut total_erro = 0usize;
    for summary in &result.summaries {
        total_records += summary.total;
        total_conferido += summary.conferido;
        total_erro += summary.erro;
        table.add_row(vec![
            Cell::new(&summary.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.total),
            count_cell(summary.conferido, Color::Green),
            count_cell(summary.erro, Color::Red),
        ]);
    }
    if result.summaries.len() > 1 {
        table.add_row(vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(total_records).add_attribute(Attribute::Bold),
            count_cell(total_conferido, Color::Green).add_attribute(Attribute::Bold),
            count_cell(total_erro, Color::Red).add_attribute(Attribute::Bold),
        ]);
    }
    println!("{table}");

    for path in &result.written {
        println!("Wrote: {}", path.display());
    }
    if !result.errors.is_empty() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

fn print_column_checks(checks: &[ColumnCheck]) {
    if checks.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Key columns found"),
        header_cell("Missing"),
    ]);
    apply_table_style(&mut table);
    for check in checks {
        let found = if check.found.is_empty() {
            dim_cell("none")
        } else {
            Cell::new(check.found.join(", "))
        };
        let missing = if check.missing.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(check.missing.join(", "))
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            Cell::new(&check.dataset)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            found,
            missing,
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
