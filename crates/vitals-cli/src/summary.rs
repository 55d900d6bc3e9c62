use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use vitals_cli::types::{RecordTypeSummary, RunResult};

/// Entries shown per record type in the completeness listing.
const COMPLETENESS_TOP: usize = 5;

pub fn print_summary(result: &RunResult) {
    println!("Raw: {}", result.raw_dir.display());
    println!("Output: {}", result.processed_dir.display());
    println!("Years: {}", result.years);
    if let Some(path) = &result.report {
        println!("Quality report: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Tipo"),
        header_cell("Files"),
        header_cell("Columns"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Excluded"),
        header_cell("Dup exact"),
        header_cell("Dup oper."),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_in = 0u64;
    let mut total_out = 0u64;
    let mut total_excluded = 0u64;
    for summary in &result.record_types {
        let stats = &summary.stats;
        total_in += stats.rows_input;
        total_out += stats.rows_output;
        total_excluded += stats.rows_excluded_missing_depreg;
        table.add_row(vec![
            Cell::new(stats.record_type.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            files_cell(summary),
            Cell::new(summary.columns),
            Cell::new(stats.rows_input),
            Cell::new(stats.rows_output),
            count_cell(stats.rows_excluded_missing_depreg, Color::Yellow),
            count_cell(stats.duplicates_exact, Color::Yellow),
            count_cell(stats.duplicates_operational, Color::Yellow),
            Cell::new(summary.output.display()),
        ]);
    }
    for failure in &result.failures {
        table.add_row(vec![
            Cell::new(&failure.record_type)
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new("FAILED").fg(Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_in).add_attribute(Attribute::Bold),
        Cell::new(total_out).add_attribute(Attribute::Bold),
        count_cell(total_excluded, Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_completeness(result);
    if !result.failures.is_empty() {
        eprintln!("Errors:");
        for failure in &result.failures {
            eprintln!("- {}: {}", failure.record_type, failure.error);
        }
    }
}

fn print_completeness(result: &RunResult) {
    if result.record_types.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Tipo"),
        header_cell("Column"),
        header_cell("Filled"),
        header_cell("%"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for summary in &result.record_types {
        let stats = &summary.stats;
        for (column, filled) in stats.completeness(COMPLETENESS_TOP) {
            table.add_row(vec![
                Cell::new(stats.record_type.as_str()),
                Cell::new(column),
                Cell::new(filled),
                Cell::new(percent(filled, stats.rows_output)),
            ]);
        }
    }
    println!();
    println!("Most complete columns:");
    println!("{table}");
}

fn percent(part: u64, total: u64) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}", part as f64 * 100.0 / total as f64)
}

fn files_cell(summary: &RecordTypeSummary) -> Cell {
    let stats = &summary.stats;
    if stats.files_skipped > 0 {
        Cell::new(format!(
            "{} ({} skipped)",
            stats.files_considered, stats.files_skipped
        ))
        .fg(Color::Yellow)
    } else {
        Cell::new(stats.files_considered)
    }
}

fn count_cell(count: u64, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_handles_empty_totals() {
        assert_eq!(percent(0, 0), "-");
        assert_eq!(percent(1, 4), "25.0");
        assert_eq!(percent(3, 3), "100.0");
    }
}
