//! Line-oriented intraday quote parser.
//!
//! Each data line is `time_marker,close,high,low,open,volume`. A marker
//! starting with [`ANCHOR_MARKER`] carries an absolute epoch-seconds value
//! and resets the clock; any other marker is an offset, in bar intervals,
//! from the most recent anchor.

use chrono::{DateTime, Utc};
use mlprep_core::error::FeedError;

/// First character of an absolute timestamp marker.
pub const ANCHOR_MARKER: char = 'a';

/// Fields per data line.
pub const FIELD_COUNT: usize = 6;

const DELIMITER: char = ',';

/// A decoded line with its numeric fields still unparsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub timestamp: DateTime<Utc>,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

/// Accumulator threaded through the line fold.
#[derive(Debug, Clone, Copy, Default)]
struct Clock {
    /// Epoch seconds of the most recent anchor line
    day_base: Option<f64>,
    /// Offset of the most recent line, in intervals
    last_offset: f64,
}

impl Clock {
    /// Advance the clock by one marker and return the line's time in seconds.
    fn advance(self, marker: &str, interval_secs: u32) -> Result<(Clock, f64), FeedError> {
        let next = match marker.strip_prefix(ANCHOR_MARKER) {
            Some(epoch) => Clock {
                day_base: Some(parse_marker(epoch, marker)?),
                last_offset: 0.0,
            },
            None => {
                if self.day_base.is_none() {
                    return Err(FeedError::Parse(format!(
                        "offset marker {:?} before any anchor line",
                        marker
                    )));
                }
                Clock {
                    day_base: self.day_base,
                    last_offset: parse_marker(marker, marker)?,
                }
            }
        };

        let base = next.day_base.unwrap_or_default();
        Ok((next, base + f64::from(interval_secs) * next.last_offset))
    }
}

fn parse_marker(value: &str, marker: &str) -> Result<f64, FeedError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| FeedError::Parse(format!("invalid time marker {:?}", marker)))
}

fn to_datetime(secs: f64) -> Result<DateTime<Utc>, FeedError> {
    DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
        .ok_or_else(|| FeedError::Parse(format!("timestamp out of range: {}", secs)))
}

/// Parser for anchor/offset encoded quote responses.
#[derive(Debug, Clone, Copy)]
pub struct BarRecordParser {
    interval_secs: u32,
    header_skip: usize,
}

impl BarRecordParser {
    /// Create a parser for bars `interval_secs` long, skipping `header_skip`
    /// preamble lines.
    pub fn new(interval_secs: u32, header_skip: usize) -> Self {
        Self {
            interval_secs,
            header_skip,
        }
    }

    /// Parse a full response body.
    pub fn parse_text(&self, text: &str) -> Result<Vec<RawBar>, FeedError> {
        self.parse(text.split('\n'))
    }

    /// Parse lines in order. Lines without exactly [`FIELD_COUNT`] fields
    /// are skipped.
    pub fn parse<'a, I>(&self, lines: I) -> Result<Vec<RawBar>, FeedError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (_, bars) = lines
            .into_iter()
            .skip(self.header_skip)
            .try_fold((Clock::default(), Vec::new()), |acc, line| self.step(acc, line))?;

        Ok(bars)
    }

    fn step(
        &self,
        (clock, mut bars): (Clock, Vec<RawBar>),
        line: &str,
    ) -> Result<(Clock, Vec<RawBar>), FeedError> {
        let fields: Vec<&str> = line.trim_end_matches('\r').split(DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Ok((clock, bars));
        }

        let (clock, secs) = clock.advance(fields[0], self.interval_secs)?;
        bars.push(RawBar {
            timestamp: to_datetime(secs)?,
            close: fields[1].to_string(),
            high: fields[2].to_string(),
            low: fields[3].to_string(),
            open: fields[4].to_string(),
            volume: fields[5].to_string(),
        });
        Ok((clock, bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_and_offset() {
        let parser = BarRecordParser::new(300, 0);
        let bars = parser
            .parse(["a1609459200,10,12,9,11,1000", "60,10.5,12.5,9.5,11.5,2000"])
            .unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.timestamp(), 1_609_459_200);
        assert_eq!(bars[1].timestamp.timestamp(), 1_609_459_200 + 300 * 60);
    }

    #[test]
    fn test_field_order() {
        let parser = BarRecordParser::new(60, 0);
        let bars = parser.parse(["a1000,1.1,2.2,0.5,1.0,77"]).unwrap();

        assert_eq!(bars[0].close, "1.1");
        assert_eq!(bars[0].high, "2.2");
        assert_eq!(bars[0].low, "0.5");
        assert_eq!(bars[0].open, "1.0");
        assert_eq!(bars[0].volume, "77");
    }

    #[test]
    fn test_new_anchor_resets_offset() {
        let parser = BarRecordParser::new(60, 0);
        let bars = parser
            .parse([
                "a1000,1,1,1,1,1",
                "5,1,1,1,1,1",
                "a90000,1,1,1,1,1",
                "2,1,1,1,1,1",
            ])
            .unwrap();

        let secs: Vec<i64> = bars.iter().map(|b| b.timestamp.timestamp()).collect();
        assert_eq!(secs, vec![1000, 1300, 90000, 90120]);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let parser = BarRecordParser::new(60, 0);
        let bars = parser
            .parse([
                "a1000,1,1,1,1,1",
                "1,1,1,1,1",
                "2,1,1,1,1,1",
                "",
                "3,1,1,1,1,1,1",
            ])
            .unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].timestamp.timestamp(), 1120);
    }

    #[test]
    fn test_header_skip() {
        let text = "EXCHANGE%3DNASDAQ\nMARKET_OPEN_MINUTE=570\nMARKET_CLOSE_MINUTE=960\n\
                    INTERVAL=300\nCOLUMNS=DATE,CLOSE,HIGH,LOW,OPEN,VOLUME\nDATA=\n\
                    TIMEZONE_OFFSET=-300\na1609459200,10,12,9,11,1000\r\n1,10,12,9,11,1000\n";
        let bars = BarRecordParser::new(300, 7).parse_text(text).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].volume, "1000");
    }

    #[test]
    fn test_offset_before_anchor_fails() {
        let parser = BarRecordParser::new(60, 0);
        assert!(parser.parse(["1,1,1,1,1,1"]).is_err());
    }

    #[test]
    fn test_bad_marker_fails() {
        let parser = BarRecordParser::new(60, 0);
        assert!(parser.parse(["axyz,1,1,1,1,1"]).is_err());
    }
}
