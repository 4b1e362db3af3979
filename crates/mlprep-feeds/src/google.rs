//! Google Finance intraday backend.
//!
//! The endpoint is unofficial and may disappear; the anchor/offset text it
//! returns is decoded by [`crate::BarRecordParser`].

use async_trait::async_trait;
use mlprep_core::error::FeedError;
use mlprep_core::traits::IntradaySource;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default endpoint for intraday price requests.
pub const GOOGLE_INTRADAY_URL: &str = "https://www.google.com/finance/getprices";

/// Preamble lines before the first data row.
pub const GOOGLE_HEADER_LINES: usize = 7;

/// Intraday quote backend over HTTP.
pub struct GoogleIntradaySource {
    client: Client,
    base_url: String,
}

impl GoogleIntradaySource {
    /// Create a backend with a request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            base_url: GOOGLE_INTRADAY_URL.to_string(),
        })
    }

    /// Point the backend at another endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the request URL.
    pub fn request_url(&self, symbol: &str, interval_secs: u32, lookback_days: u32) -> String {
        format!(
            "{}?q={}&i={}&p={}d&f=d,o,h,l,c,v",
            self.base_url, symbol, interval_secs, lookback_days
        )
    }
}

#[async_trait]
impl IntradaySource for GoogleIntradaySource {
    async fn fetch_intraday(
        &self,
        symbol: &str,
        interval_secs: u32,
        lookback_days: u32,
    ) -> Result<String, FeedError> {
        let url = self.request_url(symbol, interval_secs, lookback_days);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::Http {
                status: response.status().as_u16(),
                url,
            });
        }

        response
            .text()
            .await
            .map_err(|e| FeedError::Connection(e.to_string()))
    }

    fn header_lines(&self) -> usize {
        GOOGLE_HEADER_LINES
    }

    fn name(&self) -> &str {
        "google"
    }
}
