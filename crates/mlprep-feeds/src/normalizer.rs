//! Conversion of backend responses into canonical bar tables.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use mlprep_core::error::FeedError;
use mlprep_core::traits::{DailySource, IntradaySource, RawFrame};
use mlprep_core::types::{Bar, BarTable, FeedKind, Fractal};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::parser::{BarRecordParser, RawBar};

/// Historical retention of the intraday backend, in days.
pub const MAX_INTRADAY_LOOKBACK_DAYS: u32 = 50;

const DAILY_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// Wraps the daily and intraday backends behind one interface.
#[derive(Clone)]
pub struct FeedNormalizer {
    intraday: Arc<dyn IntradaySource>,
    daily: Arc<dyn DailySource>,
    reference_date: Option<NaiveDate>,
}

impl FeedNormalizer {
    /// Create a normalizer over the given backends.
    pub fn new(intraday: Arc<dyn IntradaySource>, daily: Arc<dyn DailySource>) -> Self {
        Self {
            intraday,
            daily,
            reference_date: None,
        }
    }

    /// Pin "today" for daily range computation.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Dispatch on the fractal's feed kind.
    pub async fn normalize(
        &self,
        symbol: &str,
        lookback_days: u32,
        fractal: Fractal,
    ) -> Result<BarTable, FeedError> {
        match fractal.kind() {
            FeedKind::Daily => self.normalize_daily(symbol, lookback_days).await,
            FeedKind::Intraday => self.normalize_intraday(symbol, lookback_days, fractal).await,
        }
    }

    /// Fetch and normalize intraday bars.
    ///
    /// The symbol is upper-cased and the lookback clamped to
    /// [`MAX_INTRADAY_LOOKBACK_DAYS`]. Every bar gets its number within the
    /// calendar day and the last bar of each day is marked.
    pub async fn normalize_intraday(
        &self,
        symbol: &str,
        lookback_days: u32,
        fractal: Fractal,
    ) -> Result<BarTable, FeedError> {
        let interval_secs = fractal
            .interval_secs()
            .ok_or_else(|| FeedError::InvalidFractal(fractal.to_string()))?;
        let symbol = symbol.to_uppercase();
        let lookback_days = lookback_days.min(MAX_INTRADAY_LOOKBACK_DAYS);

        let text = self
            .intraday
            .fetch_intraday(&symbol, interval_secs, lookback_days)
            .await?;

        let parser = BarRecordParser::new(interval_secs, self.intraday.header_lines());
        let raw = parser.parse_text(&text)?;
        debug!("{}: parsed {} intraday rows", symbol, raw.len());

        let mut bars = coerce_rows(&raw)?;
        number_sessions(&mut bars);

        Ok(warn_if_unordered(BarTable::new(symbol, FeedKind::Intraday, bars)))
    }

    /// Fetch and normalize daily bars for `[today - lookback_days, today]`.
    ///
    /// An empty backend response yields an empty table.
    pub async fn normalize_daily(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<BarTable, FeedError> {
        let end = self.today();
        let start = end - Duration::days(i64::from(lookback_days));

        let frame = self.daily.fetch_daily(symbol, start, end).await?;
        if frame.is_empty() {
            return Ok(BarTable::empty(symbol, FeedKind::Daily));
        }

        let bars = daily_bars(&frame)?;
        debug!("{}: {} daily rows from {}", symbol, bars.len(), self.daily.name());

        Ok(warn_if_unordered(BarTable::new(symbol, FeedKind::Daily, bars)))
    }
}

/// Bars are kept in the order the backend sent them, even out of time order.
fn warn_if_unordered(table: BarTable) -> BarTable {
    if !table.is_chronological() {
        warn!("{}: {} bars are not in time order", table.symbol, table.kind);
    }
    table
}

/// Canonical column name: lower case with spaces removed.
fn canonical_column(name: &str) -> String {
    name.to_lowercase().replace(' ', "")
}

fn parse_price(field: &'static str, value: &str, row: usize) -> Result<f64, FeedError> {
    value.trim().parse::<f64>().map_err(|_| FeedError::Coercion {
        field,
        value: value.to_string(),
        row,
    })
}

fn parse_volume(value: &str, row: usize) -> Result<u64, FeedError> {
    value.trim().parse::<u64>().map_err(|_| FeedError::Coercion {
        field: "volume",
        value: value.to_string(),
        row,
    })
}

/// Coerce every parsed row; one bad field fails the whole batch.
fn coerce_rows(raw: &[RawBar]) -> Result<Vec<Bar>, FeedError> {
    raw.iter()
        .enumerate()
        .map(|(row, r)| -> Result<Bar, FeedError> {
            Ok(Bar::new(
                r.timestamp,
                parse_price("open", &r.open, row)?,
                parse_price("high", &r.high, row)?,
                parse_price("low", &r.low, row)?,
                parse_price("close", &r.close, row)?,
                parse_volume(&r.volume, row)?,
            ))
        })
        .collect()
}

/// Assign per-day bar numbers in arrival order and mark each day's last bar.
fn number_sessions(bars: &mut [Bar]) {
    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    let mut last_index: HashMap<NaiveDate, usize> = HashMap::new();

    for (i, bar) in bars.iter_mut().enumerate() {
        let date = bar.date();
        let count = counts.entry(date).or_insert(0);
        *bar = bar.with_session(*count, false);
        *count += 1;
        last_index.insert(date, i);
    }

    for i in last_index.into_values() {
        if let Some(session) = bars[i].session.as_mut() {
            session.end_of_day = true;
        }
    }
}

fn parse_date(value: &str, row: usize) -> Result<DateTime<Utc>, FeedError> {
    let value = value.trim();
    if let Some(dt) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt.and_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    Err(FeedError::Coercion {
        field: "date",
        value: value.to_string(),
        row,
    })
}

/// Convert a daily backend frame into bars keyed by their date.
///
/// Columns other than date and OHLCV, such as the adjusted close, are not
/// carried over.
fn daily_bars(frame: &RawFrame) -> Result<Vec<Bar>, FeedError> {
    let columns: Vec<String> = frame.columns.iter().map(|c| canonical_column(c)).collect();
    let position = |name: &str| {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| FeedError::Parse(format!("daily feed has no {} column", name)))
    };

    let mut idx = [0usize; 6];
    for (slot, name) in idx.iter_mut().zip(DAILY_COLUMNS) {
        *slot = position(name)?;
    }
    let [date, open, high, low, close, volume] = idx;

    frame
        .rows
        .iter()
        .enumerate()
        .map(|(row, cells)| -> Result<Bar, FeedError> {
            let cell = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");
            Ok(Bar::new(
                parse_date(cell(date), row)?,
                parse_price("open", cell(open), row)?,
                parse_price("high", cell(high), row)?,
                parse_price("low", cell(low), row)?,
                parse_price("close", cell(close), row)?,
                parse_volume(cell(volume), row)?,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubIntraday {
        body: String,
        requests: Mutex<Vec<(String, u32, u32)>>,
    }

    impl StubIntraday {
        fn new(body: &str) -> Self {
            Self {
                body: body.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl IntradaySource for StubIntraday {
        async fn fetch_intraday(
            &self,
            symbol: &str,
            interval_secs: u32,
            lookback_days: u32,
        ) -> Result<String, FeedError> {
            self.requests
                .lock()
                .unwrap()
                .push((symbol.to_string(), interval_secs, lookback_days));
            Ok(self.body.clone())
        }

        fn header_lines(&self) -> usize {
            0
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct StubDaily {
        frame: RawFrame,
        ranges: Mutex<Vec<(NaiveDate, NaiveDate)>>,
    }

    impl StubDaily {
        fn new(frame: RawFrame) -> Self {
            Self {
                frame,
                ranges: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl DailySource for StubDaily {
        async fn fetch_daily(
            &self,
            _symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<RawFrame, FeedError> {
            self.ranges.lock().unwrap().push((start, end));
            Ok(self.frame.clone())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn daily_frame() -> RawFrame {
        RawFrame::new(
            vec![
                "Date".into(),
                "Open".into(),
                "High".into(),
                "Low".into(),
                "Close".into(),
                "Adj Close".into(),
                "Volume".into(),
            ],
            vec![
                vec![
                    "2024-01-02".into(),
                    "10".into(),
                    "11".into(),
                    "9".into(),
                    "10.5".into(),
                    "10.4".into(),
                    "1000".into(),
                ],
                vec![
                    "2024-01-03".into(),
                    "10.5".into(),
                    "12".into(),
                    "10".into(),
                    "11.5".into(),
                    "11.4".into(),
                    "1500".into(),
                ],
            ],
        )
    }

    fn normalizer(intraday: StubIntraday, daily: StubDaily) -> FeedNormalizer {
        FeedNormalizer::new(Arc::new(intraday), Arc::new(daily))
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
    }

    const ONE_DAY: &str = "a1609502400,10,12,9,11,1000\n1,10.5,12.5,9.5,11.5,2000\n2,11,13,10,12,3000\n";

    #[tokio::test]
    async fn test_intraday_session_numbering() {
        let feeds = normalizer(StubIntraday::new(ONE_DAY), StubDaily::new(RawFrame::default()));
        let table = feeds
            .normalize_intraday("aapl", 10, Fractal::Intraday { minutes: 5 })
            .await
            .unwrap();

        let numbers: Vec<u32> = table
            .iter()
            .map(|b| b.session.unwrap().bar_number)
            .collect();
        let eod: Vec<bool> = table.iter().map(|b| b.is_end_of_day()).collect();

        assert_eq!(numbers, vec![0, 1, 2]);
        assert_eq!(eod, vec![false, false, true]);
        assert_eq!(table.bars()[1].open, 11.5);
        assert_eq!(table.bars()[1].close, 10.5);
        assert_eq!(table.bars()[2].volume, 3000);
    }

    #[tokio::test]
    async fn test_intraday_two_days() {
        let body = "a1609502400,1,1,1,1,1\n1,1,1,1,1,1\na1609588800,1,1,1,1,1\n1,1,1,1,1,1\n2,1,1,1,1,1\n";
        let feeds = normalizer(StubIntraday::new(body), StubDaily::new(RawFrame::default()));
        let table = feeds
            .normalize_intraday("spy", 5, Fractal::Intraday { minutes: 1 })
            .await
            .unwrap();

        let numbers: Vec<u32> = table
            .iter()
            .map(|b| b.session.unwrap().bar_number)
            .collect();
        let eod: Vec<bool> = table.iter().map(|b| b.is_end_of_day()).collect();

        assert_eq!(numbers, vec![0, 1, 0, 1, 2]);
        assert_eq!(eod, vec![false, true, false, false, true]);
    }

    #[tokio::test]
    async fn test_intraday_request_shape() {
        let stub = Arc::new(StubIntraday::new(ONE_DAY));
        let feeds = FeedNormalizer::new(stub.clone(), Arc::new(StubDaily::new(RawFrame::default())));

        let table = feeds
            .normalize_intraday("msft", 120, Fractal::Intraday { minutes: 15 })
            .await
            .unwrap();

        assert_eq!(table.symbol, "MSFT");
        let requests = stub.requests.lock().unwrap();
        assert_eq!(requests[0], ("MSFT".to_string(), 900, MAX_INTRADAY_LOOKBACK_DAYS));
    }

    #[tokio::test]
    async fn test_intraday_malformed_line_dropped() {
        let body = "a1609502400,10,12,9,11,1000\n1,10,12,9,11\n2,11,13,10,12,3000\n";
        let feeds = normalizer(StubIntraday::new(body), StubDaily::new(RawFrame::default()));
        let table = feeds
            .normalize_intraday("aapl", 10, Fractal::Intraday { minutes: 5 })
            .await
            .unwrap();

        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn test_intraday_coercion_fails_batch() {
        let body = "a1609502400,10,12,9,11,1000\n1,10,12,abc,11,2000\n";
        let feeds = normalizer(StubIntraday::new(body), StubDaily::new(RawFrame::default()));
        let result = feeds
            .normalize_intraday("aapl", 10, Fractal::Intraday { minutes: 5 })
            .await;

        match result {
            Err(FeedError::Coercion { field, row, .. }) => {
                assert_eq!(field, "low");
                assert_eq!(row, 1);
            }
            other => panic!("expected coercion error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_intraday_rejects_daily_fractal() {
        let feeds = normalizer(StubIntraday::new(ONE_DAY), StubDaily::new(RawFrame::default()));
        let result = feeds.normalize_intraday("aapl", 10, Fractal::Daily).await;
        assert!(matches!(result, Err(FeedError::InvalidFractal(_))));
    }

    #[tokio::test]
    async fn test_daily_normalization() {
        let stub = Arc::new(StubDaily::new(daily_frame()));
        let feeds = FeedNormalizer::new(Arc::new(StubIntraday::new("")), stub.clone())
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());

        let table = feeds.normalize_daily("AAPL", 30).await.unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.kind, FeedKind::Daily);
        assert_eq!(table.bars()[0].date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(table.bars()[1].close, 11.5);
        assert!(table.bars()[0].session.is_none());

        let ranges = stub.ranges.lock().unwrap();
        assert_eq!(
            ranges[0],
            (
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
            )
        );
    }

    #[tokio::test]
    async fn test_daily_empty_is_not_error() {
        let feeds = normalizer(StubIntraday::new(""), StubDaily::new(RawFrame::default()));
        let table = feeds.normalize_daily("NONE", 30).await.unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_daily_idempotent() {
        let feeds = normalizer(StubIntraday::new(""), StubDaily::new(daily_frame()));
        let first = feeds.normalize_daily("AAPL", 30).await.unwrap();
        let second = feeds.normalize_daily("AAPL", 30).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_daily_out_of_order_kept() {
        let mut frame = daily_frame();
        frame.rows.reverse();
        let feeds = normalizer(StubIntraday::new(""), StubDaily::new(frame));

        let table = feeds.normalize_daily("AAPL", 30).await.unwrap();
        assert!(!table.is_chronological());
        assert_eq!(table.len(), 2);
        assert_eq!(table.bars()[0].date(), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[tokio::test]
    async fn test_daily_missing_column() {
        let frame = RawFrame::new(
            vec!["Date".into(), "Close".into()],
            vec![vec!["2024-01-02".into(), "1".into()]],
        );
        let feeds = normalizer(StubIntraday::new(""), StubDaily::new(frame));
        assert!(matches!(
            feeds.normalize_daily("AAPL", 30).await,
            Err(FeedError::Parse(_))
        ));
    }

    #[test]
    fn test_canonical_column() {
        assert_eq!(canonical_column("Adj Close"), "adjclose");
        assert_eq!(canonical_column("Volume"), "volume");
    }
}
