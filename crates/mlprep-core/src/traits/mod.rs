//! Seams to external collaborators.

mod feed;
mod store;

pub use feed::{DailySource, IntradaySource, RawFrame};
pub use store::TableStore;
