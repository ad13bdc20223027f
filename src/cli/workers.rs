//! Workers command handler

use crate::cli::output::{format_workers_json, format_workers_table, WorkerView};
use crate::cli::WorkersArgs;
use crate::config::MagnetarConfig;
use anyhow::Result;

/// Handle `magnetar workers` command
pub fn handle_workers(args: &WorkersArgs) -> Result<String> {
    let config = if args.config.exists() {
        MagnetarConfig::load(Some(&args.config))?
    } else {
        MagnetarConfig::default()
    };
    let config = config.with_env_overrides();

    let workers: Vec<WorkerView> = config
        .pool
        .workers
        .iter()
        .enumerate()
        .map(|(index, url)| WorkerView {
            index,
            url: url.clone(),
        })
        .collect();

    if args.json {
        Ok(format_workers_json(&workers))
    } else {
        Ok(format_workers_table(&workers))
    }
}
