use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use vitals_cli::pipeline::{RunOptions, run_pipeline};
use vitals_cli::types::RunResult;
use vitals_model::RunConfig;

use crate::cli::RunArgs;
use crate::summary::apply_table_style;

pub fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    match path {
        Some(path) => {
            RunConfig::load(path).with_context(|| format!("load config {}", path.display()))
        }
        None => Ok(RunConfig::default()),
    }
}

pub fn run_tipos(config: &RunConfig) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Tipo", "Description", "Numeric fields", "Default"]);
    apply_table_style(&mut table);
    for record_type in &config.record_types {
        let numeric = record_type
            .numeric_fields
            .iter()
            .map(|field| field.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let selected = if config.selected.contains(&record_type.name) {
            "yes"
        } else {
            "-"
        };
        table.add_row(vec![
            record_type.name.to_string(),
            record_type.display_description().to_string(),
            numeric,
            selected.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_clean(args: &RunArgs, config: RunConfig) -> Result<RunResult> {
    let record_types = config
        .resolve_selection(&args.tipos)
        .context("resolve record types")?;
    let span = info_span!(
        "run",
        raw_dir = %args.raw_dir.display(),
        processed_dir = %args.processed_dir.display(),
        years = %config.years
    );
    let _guard = span.enter();

    let options = RunOptions {
        raw_dir: args.raw_dir.clone(),
        processed_dir: args.processed_dir.clone(),
        config,
        record_types,
        parallel: args.parallel,
    };
    let start = Instant::now();
    let result = run_pipeline(&options)?;
    info!(
        record_types = result.record_types.len(),
        failures = result.failures.len(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(result)
}
