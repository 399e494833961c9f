//! Parser for the radon logger's raw `.RAD` text dumps.
//!
//! Each line looks like
//!
//! ```text
//! :03/14 (ARTK 01)  120  118       131
//! ```
//!
//! a `:MM/DD` date, an instrument block closed by `)`, then one reading per
//! hour starting at 00:00. A reading is a run of digits; five blanks stand
//! for a missing reading. The year is not on the line: it comes from the
//! two-digit tag in the file name (`ARTK21.RAD` -> 2021).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use rssp_utils::dates::expand_year_tag;
use std::fmt;

static DATE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:(\d{2})/(\d{2})").unwrap());
static READING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+| {5})").unwrap());
static YEAR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{2})").unwrap());
static STATION_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-z]{4})").unwrap());

pub const HOURS_PER_DAY: usize = 24;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RawRadError {
    NoYearTag(String),
}

impl fmt::Display for RawRadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawRadError::NoYearTag(name) => {
                write!(f, "file name '{}' carries no two-digit year", name)
            }
        }
    }
}

impl std::error::Error for RawRadError {}

/// One hourly reading recovered from a raw dump.
#[derive(Debug, PartialEq, Clone)]
pub struct RawReading {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
}

impl RawReading {
    /// Zero-padded hour label as written to CSV, e.g. "07:00".
    pub fn hour_label(&self) -> String {
        self.timestamp.format("%H:00").to_string()
    }
}

/// Result of converting one raw file.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct RadConversion {
    /// Upper-cased leading four letters of the file name, if any.
    pub station: Option<String>,
    pub year: i32,
    pub readings: Vec<RawReading>,
    /// Lines without a usable `:MM/DD` prefix.
    pub skipped_lines: usize,
    /// Readings past the 24th on a line.
    pub dropped_readings: usize,
}

/// Parse a raw `.RAD` file. `file_name` is the bare name, used for the year
/// tag and station code.
pub fn parse_rad(file_name: &str, contents: &str) -> Result<RadConversion, RawRadError> {
    let tag: u32 = YEAR_TAG
        .captures(file_name)
        .and_then(|c| c[1].parse().ok())
        .ok_or_else(|| RawRadError::NoYearTag(file_name.to_string()))?;
    let year = expand_year_tag(tag);
    let station = STATION_PREFIX
        .captures(file_name)
        .map(|c| c[1].to_uppercase());

    let mut conversion = RadConversion {
        station,
        year,
        ..Default::default()
    };

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(date) = line_date(line, year) else {
            conversion.skipped_lines += 1;
            continue;
        };
        // only leading blanks can stand for a missing hour
        let readings_part = match line.rfind(')') {
            Some(pos) => &line[pos + 1..],
            None => &line[6..],
        }
        .trim_end();
        for (hour, token) in READING.find_iter(readings_part).enumerate() {
            if hour >= HOURS_PER_DAY {
                conversion.dropped_readings += 1;
                continue;
            }
            let time = NaiveTime::from_hms_opt(hour as u32, 0, 0).unwrap_or_default();
            let value = token.as_str().trim().parse::<f64>().ok();
            conversion.readings.push(RawReading {
                timestamp: date.and_time(time),
                value,
            });
        }
    }

    if conversion.skipped_lines > 0 {
        warn!(
            "convert: {} lines in {} had no date prefix",
            conversion.skipped_lines, file_name
        );
    }
    if conversion.dropped_readings > 0 {
        warn!(
            "convert: dropped {} readings past hour 23 in {}",
            conversion.dropped_readings, file_name
        );
    }
    Ok(conversion)
}

fn line_date(line: &str, year: i32) -> Option<NaiveDate> {
    let caps = DATE_PREFIX.captures(line)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::{parse_rad, RawRadError};
    use chrono::Timelike;

    const SAMPLE: &str = ":03/14 (ARTK 01)  120  118       131\n\
:03/15 (ARTK 01)  99\n\
garbage line\n\
\n";

    #[test]
    fn test_parse_sample() {
        let conversion = parse_rad("ARTK21.RAD", SAMPLE).unwrap();
        assert_eq!(conversion.year, 2021);
        assert_eq!(conversion.station.as_deref(), Some("ARTK"));
        assert_eq!(conversion.skipped_lines, 1);
        let values: Vec<_> = conversion.readings.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![Some(120.0), Some(118.0), None, Some(131.0), Some(99.0)]);
        assert_eq!(conversion.readings[3].timestamp.hour(), 3);
        assert_eq!(conversion.readings[3].hour_label(), "03:00");
        assert_eq!(conversion.readings[4].timestamp.to_string(), "2021-03-15 00:00:00");
    }

    #[test]
    fn test_invalid_calendar_day_is_skipped() {
        let conversion = parse_rad("PARA22.RAD", ":02/30 (X) 1 2\n").unwrap();
        assert!(conversion.readings.is_empty());
        assert_eq!(conversion.skipped_lines, 1);
    }

    #[test]
    fn test_readings_past_midnight_are_dropped() {
        let hours = (0..26).map(|h| h.to_string()).collect::<Vec<_>>().join(" ");
        let line = format!(":01/01 (X) {}\n", hours);
        let conversion = parse_rad("PARA22.RAD", &line).unwrap();
        assert_eq!(conversion.readings.len(), 24);
        assert_eq!(conversion.dropped_readings, 2);
    }

    #[test]
    fn test_trailing_padding_adds_no_readings() {
        let conversion = parse_rad("PARA22.RAD", ":01/01 (X)      7            \r\n").unwrap();
        let values: Vec<_> = conversion.readings.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![None, Some(7.0)]);
        assert_eq!(conversion.dropped_readings, 0);

        let full = (0..24).map(|h| h.to_string()).collect::<Vec<_>>().join(" ");
        let line = format!(":01/02 (X) {}{}\n", full, " ".repeat(15));
        let conversion = parse_rad("PARA22.RAD", &line).unwrap();
        assert_eq!(conversion.readings.len(), 24);
        assert_eq!(conversion.dropped_readings, 0);
    }

    #[test]
    fn test_missing_year_tag() {
        assert_eq!(
            parse_rad("PARA.RAD", ""),
            Err(RawRadError::NoYearTag("PARA.RAD".to_string()))
        );
    }
}
