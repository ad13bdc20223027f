//! Output formatting helpers for CLI commands

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// View model for a pool entry
#[derive(Debug, Clone, serde::Serialize)]
pub struct WorkerView {
    /// Position in rotation order
    pub index: usize,
    pub url: String,
}

/// Format the worker pool as a table
pub fn format_workers_table(workers: &[WorkerView]) -> String {
    if workers.is_empty() {
        return format!("{}", "No workers configured.".yellow());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Worker URL"]);

    for worker in workers {
        table.add_row(vec![
            Cell::new(worker.index),
            Cell::new(&worker.url),
        ]);
    }

    table.to_string()
}

/// Format the worker pool as JSON
pub fn format_workers_json(workers: &[WorkerView]) -> String {
    serde_json::to_string_pretty(&json!({
        "workers": workers
    }))
    .unwrap()
}
