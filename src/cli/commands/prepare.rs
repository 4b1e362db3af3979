//! Prepare command implementation.

use anyhow::{Context, Result};
use mlprep_config::load_config;
use mlprep_data::write_dataset;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::cli::PrepareArgs;
use crate::pipeline::prepare;

pub async fn run(args: PrepareArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path).context("Failed to load configuration")?;
    info!("Preparing data in {}", config.model.directory.display());

    let data = prepare(&config).context("Data preparation failed")?;

    let output = args
        .output
        .unwrap_or_else(|| config.model.directory.join("output"));
    fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let target = &config.model.target;
    for (name, dataset) in [("train", &data.train), ("test", &data.test)] {
        let path = output.join(format!("{}.csv", name));
        write_dataset(&path, dataset, target)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "{:<6} {:>8} rows {:>4} features  -> {}",
            name,
            dataset.n_samples(),
            dataset.n_features(),
            path.display()
        );
    }

    if data.train.has_labels() {
        for (class, count) in data.train.class_counts() {
            println!("  class {:<6} {:>8}", class, count);
        }
    }

    Ok(())
}
