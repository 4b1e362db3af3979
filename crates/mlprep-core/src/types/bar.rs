//! OHLCV bar types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::FeedKind;

/// Position of an intraday bar within its trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionMark {
    /// 0-based arrival order within the calendar day
    pub bar_number: u32,
    /// True on the last bar seen for the day
    pub end_of_day: bool,
}

/// One OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar time; daily bars sit at midnight UTC
    pub timestamp: DateTime<Utc>,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: u64,
    /// Intraday numbering, absent on daily bars
    pub session: Option<SessionMark>,
}

impl Bar {
    /// Create a new bar without session numbering.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            session: None,
        }
    }

    /// Attach intraday session numbering.
    pub fn with_session(mut self, bar_number: u32, end_of_day: bool) -> Self {
        self.session = Some(SessionMark {
            bar_number,
            end_of_day,
        });
        self
    }

    /// Calendar date of the bar.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Check whether this is the last bar of its trading day.
    #[inline]
    pub fn is_end_of_day(&self) -> bool {
        self.session.map(|s| s.end_of_day).unwrap_or(false)
    }
}

/// Bars for one instrument, in parse order.
///
/// Only the OHLCV fields and the intraday session columns are kept. Extra
/// backend columns such as the adjusted close are dropped on normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTable {
    /// Symbol identifier
    pub symbol: String,
    /// Feed granularity the bars came from
    pub kind: FeedKind,
    bars: Vec<Bar>,
}

impl BarTable {
    /// Create a table from already-normalized bars.
    pub fn new(symbol: impl Into<String>, kind: FeedKind, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            bars,
        }
    }

    /// Create an empty table.
    pub fn empty(symbol: impl Into<String>, kind: FeedKind) -> Self {
        Self::new(symbol, kind, Vec::new())
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }

    /// Check whether bars are in non-decreasing time order.
    pub fn is_chronological(&self) -> bool {
        self.bars.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
    }
}
