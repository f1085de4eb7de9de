use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use exo_model::{DispositionSummary, Label, Prediction};
use exo_train::TrainingOutcome;

use crate::types::PredictionReport;

/// Rows shown in the prediction table before it is truncated.
const PREVIEW_ROWS: usize = 25;

pub fn print_training_summary(outcome: &TrainingOutcome) {
    println!("{}", disposition_table(&outcome.summary));
    if !outcome.summary.unknown_values.is_empty() {
        let values: Vec<&str> = outcome
            .summary
            .unknown_values
            .iter()
            .map(|value| if value.is_empty() { "<blank>" } else { value.as_str() })
            .collect();
        eprintln!("Unmapped dispositions: {}", values.join(", "));
    }
    let features: Vec<&str> = outcome.features.iter().map(|f| f.column_name()).collect();
    println!("Features: {}", features.join(", "));
    println!(
        "Split: {} train / {} test",
        outcome.train_rows, outcome.test_rows
    );
    println!();
    println!("{}", outcome.report);
    println!("Model saved: {}", outcome.model_path.display());
}

pub fn disposition_table(summary: &DispositionSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Outcome"),
        header_cell("Class"),
        header_cell("Rows"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        label_cell(Label::Planet),
        Cell::new(Label::Planet.class()),
        Cell::new(summary.planets),
    ]);
    table.add_row(vec![
        label_cell(Label::NonPlanet),
        Cell::new(Label::NonPlanet.class()),
        Cell::new(summary.non_planets),
    ]);
    table.add_row(vec![
        Cell::new("Dropped (unmapped)").fg(Color::Yellow),
        dim_cell("-"),
        count_cell(summary.rows_dropped, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(summary.rows_read).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn print_predictions(report: &PredictionReport) {
    println!("Source: {}", report.source.display());
    if !report.has_snr {
        eprintln!("warning: no 'snr' column; every row defaults to Not a Planet at 0.50");
    }
    println!("{}", prediction_table(report));
    if report.rows.len() > PREVIEW_ROWS {
        println!("... {} more rows", report.rows.len() - PREVIEW_ROWS);
    }
    println!(
        "{} of {} rows classified as {}",
        report.planet_count(),
        report.rows.len(),
        Label::Planet.display_name()
    );
    if let Some(path) = &report.output {
        println!("Output: {}", path.display());
    }
}

pub fn prediction_table(report: &PredictionReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("SNR"),
        header_cell("Prediction"),
        header_cell("Probability"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for row in report.rows.iter().take(PREVIEW_ROWS) {
        table.add_row(vec![
            Cell::new(row.row),
            row.snr
                .map_or_else(|| dim_cell("-"), |snr| Cell::new(format!("{snr:.2}"))),
            prediction_cell(row.prediction),
            Cell::new(format!("{:.4}", row.prediction.confidence)),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
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

fn label_cell(label: Label) -> Cell {
    Cell::new(label.display_name()).fg(label_color(label))
}

fn prediction_cell(prediction: Prediction) -> Cell {
    Cell::new(prediction.label.display_name()).fg(label_color(prediction.label))
}

fn label_color(label: Label) -> Color {
    match label {
        Label::Planet => Color::Green,
        Label::NonPlanet => Color::Blue,
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
