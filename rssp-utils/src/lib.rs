//! Shared utility functions for RSSP crates.

/// Date and hour-label utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    /// Date layouts found in station CSV exports, tried in order.
    /// Month-first layouts win over day-first ones; the two-digit year
    /// layout must precede the four-digit one.
    pub const DATE_FORMATS: [&str; 6] = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%y",
        "%m/%d/%Y",
        "%d.%m.%Y",
        "%Y%m%d",
    ];

    /// Hover-label layout for absolute timestamps.
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Format a timestamp as "YYYY-MM-DD HH:MM:SS"
    pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
        timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Parse a calendar date in any of the [`DATE_FORMATS`].
    ///
    /// A trailing time component ("2021-03-01 00:00:00") is ignored, since
    /// the hour lives in its own column.
    pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
        let trimmed = s.trim();
        let date_part = trimmed.split_whitespace().next().unwrap_or("");
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
            .ok_or_else(|| DateError(format!("unrecognised date '{}'", trimmed)))
    }

    /// Parse an hour label: "HH:MM", "HH:MM:SS" or a bare "H"/"HH".
    pub fn parse_hour(s: &str) -> Result<NaiveTime, DateError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError("empty hour label".to_string()));
        }
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M:%S") {
            return Ok(time);
        }
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M") {
            return Ok(time);
        }
        trimmed
            .parse::<u32>()
            .ok()
            .and_then(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .ok_or_else(|| DateError(format!("unrecognised hour '{}'", trimmed)))
    }

    /// Combine a date column and an hour column into one timestamp.
    pub fn combine(date: &str, hour: &str) -> Result<NaiveDateTime, DateError> {
        let date = parse_date(date)?;
        let time = parse_hour(hour)?;
        Ok(date.and_time(time))
    }

    /// Expand a two-digit year tag (21 -> 2021).
    pub fn expand_year_tag(tag: u32) -> i32 {
        2000 + (tag % 100) as i32
    }

}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
