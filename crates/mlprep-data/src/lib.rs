//! Dataset loading, shuffling and table export.
//!
//! This crate provides:
//! - Delimited text file reading into untyped frames
//! - The loading step: target extraction, label encoding and feature selection
//! - Seeded row shuffling
//! - CSV export of bar tables and prepared datasets

mod export;
mod loader;
mod reader;
mod shuffle;

pub use export::{write_bar_table, write_dataset};
pub use loader::{get_data, input_path, LabelEncoder};
pub use reader::read_frame;
pub use shuffle::shuffle_data;
