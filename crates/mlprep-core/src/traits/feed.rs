//! Quote backend trait definitions.

use crate::error::FeedError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Tabular response of a daily backend, every cell still a string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    /// Column names as the backend spells them
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawFrame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trait for daily (date-only) quote backends.
#[async_trait]
pub trait DailySource: Send + Sync {
    /// Fetch daily rows for the closed date range `[start, end]`.
    ///
    /// The frame carries at least `date, open, high, low, close, volume`
    /// columns in the backend's own spelling. An unknown symbol or an empty
    /// range yields an empty frame.
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawFrame, FeedError>;

    /// Get the backend identifier.
    fn name(&self) -> &str;
}

/// Trait for intraday quote backends returning line-oriented text.
#[async_trait]
pub trait IntradaySource: Send + Sync {
    /// Fetch the raw response for `lookback_days` of `interval_secs` bars.
    async fn fetch_intraday(
        &self,
        symbol: &str,
        interval_secs: u32,
        lookback_days: u32,
    ) -> Result<String, FeedError>;

    /// Number of preamble lines before the first data row.
    fn header_lines(&self) -> usize;

    /// Get the backend identifier.
    fn name(&self) -> &str;
}
