//! Core types and traits for dataset preparation.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarTable) and sampling frequencies (Fractal)
//! - Labeled datasets (Dataset) shared by the loading and resampling steps
//! - Core traits for quote backends and the named-table store

pub mod types;
pub mod traits;
pub mod error;

pub use error::{PrepError, PrepResult};
pub use types::*;
pub use traits::*;
