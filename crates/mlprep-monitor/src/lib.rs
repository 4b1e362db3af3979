//! Logging setup.

mod logging;

pub use logging::{filter_directives, setup_logging, LogFormat};
