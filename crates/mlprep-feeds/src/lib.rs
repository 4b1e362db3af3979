//! Quote feed ingestion.
//!
//! Raw intraday and daily quote responses are normalized into one canonical
//! bar schema and registered, one table per symbol, with a named-table store:
//! - `BarRecordParser` decodes the anchor/offset line format
//! - `FeedNormalizer` coerces, numbers and marks bars per trading day
//! - `FeedOrchestrator` walks a symbol group and fills the store

mod google;
mod normalizer;
mod orchestrator;
mod parser;
mod store;
mod yahoo;

pub use google::{GoogleIntradaySource, GOOGLE_HEADER_LINES, GOOGLE_INTRADAY_URL};
pub use normalizer::{FeedNormalizer, MAX_INTRADAY_LOOKBACK_DAYS};
pub use orchestrator::FeedOrchestrator;
pub use parser::{BarRecordParser, RawBar, ANCHOR_MARKER, FIELD_COUNT};
pub use store::MemoryTableStore;
pub use yahoo::{YahooDailySource, YAHOO_DAILY_URL};
