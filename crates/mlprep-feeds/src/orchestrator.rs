//! Group-level feed retrieval.

use mlprep_core::traits::TableStore;
use mlprep_core::types::{FeedKind, Group};
use tracing::{error, info, warn};

use crate::normalizer::{FeedNormalizer, MAX_INTRADAY_LOOKBACK_DAYS};

/// Fetches every symbol of a group and registers the resulting tables.
pub struct FeedOrchestrator {
    normalizer: FeedNormalizer,
}

impl FeedOrchestrator {
    /// Create an orchestrator over a normalizer.
    pub fn new(normalizer: FeedNormalizer) -> Self {
        Self { normalizer }
    }

    /// Fetch `lookback_days` of bars for every member of `group`.
    ///
    /// Symbols are processed one at a time in declared order. Non-empty
    /// tables are registered under the lower-cased symbol; empty or failed
    /// symbols are logged and skipped. Returns `true` when the daily backend
    /// served the group.
    pub async fn fetch_group(
        &self,
        group: &Group,
        lookback_days: u32,
        store: &mut dyn TableStore,
    ) -> bool {
        let kind = group.fractal.kind();
        match kind {
            FeedKind::Daily => info!("Getting daily data for group {}", group.name),
            FeedKind::Intraday => info!(
                "Getting intraday data for group {} ({}-day limit)",
                group.name, MAX_INTRADAY_LOOKBACK_DAYS
            ),
        }

        for symbol in &group.members {
            info!("Getting {} data for last {} days", symbol, lookback_days);

            match self
                .normalizer
                .normalize(symbol, lookback_days, group.fractal)
                .await
            {
                Ok(table) if !table.is_empty() => {
                    info!("{}: {} bars", symbol, table.len());
                    store.register(&symbol.to_lowercase(), table);
                }
                Ok(_) => warn!("Could not get data for: {}", symbol),
                Err(e) => error!("Could not get data for {}: {}", symbol, e),
            }
        }

        kind.is_daily()
    }
}
