//! Sampling frequency descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FeedError;

/// Which backend serves a group of symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Date-only bars from the daily backend
    Daily,
    /// Date and time bars from the intraday backend
    Intraday,
}

impl FeedKind {
    /// Check if this is the daily path.
    pub fn is_daily(&self) -> bool {
        matches!(self, FeedKind::Daily)
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::Daily => write!(f, "daily"),
            FeedKind::Intraday => write!(f, "intraday"),
        }
    }
}

/// Sampling frequency of a price series, e.g. `1d` or `5m`.
///
/// Any descriptor containing a `d` is daily. Otherwise the first run of
/// digits is the bar length in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Fractal {
    Daily,
    Intraday { minutes: u32 },
}

impl Fractal {
    /// Get the backend that serves this frequency.
    pub fn kind(&self) -> FeedKind {
        match self {
            Fractal::Daily => FeedKind::Daily,
            Fractal::Intraday { .. } => FeedKind::Intraday,
        }
    }

    /// Bar length in seconds for intraday fractals, `None` for daily ones
    /// or when the length does not fit a `u32`.
    pub fn interval_secs(&self) -> Option<u32> {
        match self {
            Fractal::Daily => None,
            Fractal::Intraday { minutes } => minutes.checked_mul(60),
        }
    }
}

impl fmt::Display for Fractal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fractal::Daily => write!(f, "1d"),
            Fractal::Intraday { minutes } => write!(f, "{}m", minutes),
        }
    }
}

impl FromStr for Fractal {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.to_ascii_lowercase().contains('d') {
            return Ok(Fractal::Daily);
        }

        let digits: String = s
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();

        match digits.parse::<u32>() {
            Ok(minutes) if minutes > 0 && minutes.checked_mul(60).is_some() => {
                Ok(Fractal::Intraday { minutes })
            }
            _ => Err(FeedError::InvalidFractal(s.to_string())),
        }
    }
}

impl TryFrom<String> for Fractal {
    type Error = FeedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fractal> for String {
    fn from(fractal: Fractal) -> Self {
        fractal.to_string()
    }
}
