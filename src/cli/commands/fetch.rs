//! Fetch command implementation.

use anyhow::{Context, Result};
use mlprep_config::load_config;
use mlprep_data::write_bar_table;
use mlprep_feeds::{
    FeedNormalizer, FeedOrchestrator, GoogleIntradaySource, MemoryTableStore, YahooDailySource,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::cli::FetchArgs;

pub async fn run(args: FetchArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path).context("Failed to load configuration")?;
    let group = config.group.group();
    if group.members.is_empty() {
        anyhow::bail!("Group '{}' has no members; set [group] members in the config", group.name);
    }
    let lookback = args.lookback.unwrap_or(config.group.lookback_days);

    let timeout = Duration::from_secs(config.feeds.timeout_secs);
    let intraday = GoogleIntradaySource::new(timeout)
        .context("Failed to create intraday client")?
        .with_base_url(config.feeds.intraday_url.clone());
    let daily = YahooDailySource::new(timeout)
        .context("Failed to create daily client")?
        .with_base_url(config.feeds.daily_url.clone());
    let orchestrator =
        FeedOrchestrator::new(FeedNormalizer::new(Arc::new(intraday), Arc::new(daily)));

    let mut store = MemoryTableStore::new();
    let daily_path = orchestrator.fetch_group(&group, lookback, &mut store).await;
    info!(
        "Fetched {} of {} symbols ({} feed)",
        store.len(),
        group.members.len(),
        if daily_path { "daily" } else { "intraday" }
    );

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    for (name, table) in store.iter() {
        let path = args.output.join(format!("{}.csv", name));
        write_bar_table(&path, table)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{:<10} {:>6} bars  -> {}", name, table.len(), path.display());
    }

    Ok(())
}
