//! Yahoo Finance daily backend.

use async_trait::async_trait;
use chrono::{Duration as DateDuration, NaiveDate};
use csv::ReaderBuilder;
use mlprep_core::error::FeedError;
use mlprep_core::traits::{DailySource, RawFrame};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Default endpoint for daily history downloads.
pub const YAHOO_DAILY_URL: &str = "https://query1.finance.yahoo.com/v7/finance/download";

/// Daily quote backend returning CSV history.
pub struct YahooDailySource {
    client: Client,
    base_url: String,
}

impl YahooDailySource {
    /// Create a backend with a request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            base_url: YAHOO_DAILY_URL.to_string(),
        })
    }

    /// Point the backend at another endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the request URL for the closed range `[start, end]`.
    pub fn request_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let period1 = start.and_hms_opt(0, 0, 0).map(|t| t.and_utc().timestamp()).unwrap_or(0);
        let period2 = (end + DateDuration::days(1))
            .and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc().timestamp())
            .unwrap_or(0);
        format!(
            "{}/{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url, symbol, period1, period2
        )
    }
}

/// Parse a CSV body into a raw frame.
pub(crate) fn parse_csv(body: &str) -> Result<RawFrame, FeedError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| FeedError::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| FeedError::Parse(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawFrame::new(columns, rows))
}

#[async_trait]
impl DailySource for YahooDailySource {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawFrame, FeedError> {
        let url = self.request_url(symbol, start, end);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::Connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!("{}: no daily history at {}", symbol, self.name());
            return Ok(RawFrame::default());
        }
        if !status.is_success() {
            return Err(FeedError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Connection(e.to_string()))?;
        parse_csv(&body)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}
