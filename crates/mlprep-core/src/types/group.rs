//! Symbol groups.

use serde::{Deserialize, Serialize};

use super::Fractal;

/// A named set of symbols sharing one sampling frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub fractal: Fractal,
    /// Symbols in declared order
    pub members: Vec<String>,
}

impl Group {
    pub fn new(name: impl Into<String>, fractal: Fractal, members: Vec<String>) -> Self {
        Self {
            name: name.into(),
            fractal,
            members,
        }
    }
}
