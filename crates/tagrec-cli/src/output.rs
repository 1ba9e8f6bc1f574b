//! Console rendering for training reports and recommendation tables.

use colored::Colorize;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Table};
use tagrec_core::recommend::Recommendation;
use tagrec_core::train::EpochReport;

/// Prints one epoch's losses and factorized top-K accuracy.
pub fn print_epoch(report: &EpochReport) {
    let val = report
        .val_loss
        .map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
    let top_k = report
        .top_k_accuracy
        .iter()
        .map(|(k, acc)| format!("top{k}={acc:.3}"))
        .collect::<Vec<_>>()
        .join(" ");

    println!(
        "{} train_loss={:.4} val_loss={} {}",
        format!("epoch {}", report.epoch).bold(),
        report.train_loss,
        val,
        top_k.dimmed()
    );
}

/// Renders recommendations as a table: score, id, name, tags, calories, image.
pub fn print_recommendations(results: &[Recommendation]) {
    if results.is_empty() {
        println!("No recommendations.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(vec![
        "#", "score", "recipe_id", "name", "tags", "calories", "img_url",
    ]);

    for (i, rec) in results.iter().enumerate() {
        let calories = rec
            .calories
            .map_or_else(|| "-".to_string(), |c| format!("{c:.0}"));
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", rec.score)).set_alignment(CellAlignment::Right),
            Cell::new(&rec.recipe_id),
            Cell::new(&rec.name),
            Cell::new(&rec.tags),
            Cell::new(calories).set_alignment(CellAlignment::Right),
            Cell::new(&rec.img_url),
        ]);
    }

    println!("{table}");
}
