//! Validate configuration command.

use anyhow::Result;
use mlprep_config::load_config;
use std::path::Path;

use crate::pipeline::rebalancing_request;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if config.sampling.option {
        if let Err(e) = rebalancing_request(&config.sampling) {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    println!("Configuration is valid!");
    println!();
    println!("Model directory: {}", config.model.directory.display());
    println!("Target: {} ({})", config.model.target, config.model.model_type);
    println!(
        "Sampling: {}",
        if config.sampling.option {
            config.sampling.method.as_str()
        } else {
            "off"
        }
    );
    println!(
        "Group: {} [{}] {} symbols",
        config.group.name,
        config.group.fractal,
        config.group.members.len()
    );
    println!("Log level: {}", config.logging.level);
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}
