//! CLI command implementations.

pub mod fetch;
pub mod methods;
pub mod prepare;
pub mod validate;
