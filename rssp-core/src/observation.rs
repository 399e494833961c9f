use crate::{analysis::SeriesKey, month_day::MonthDay};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use rssp_utils::{dates, error::DateError};
use std::{fmt, hash::Hash};

/// Header names accepted for each required column, compared case-insensitively.
pub const DATE_COLUMNS: [&str; 1] = ["date"];
pub const HOUR_COLUMNS: [&str; 1] = ["hour"];
/// Older exports call the measurement column `data`.
pub const VALUE_COLUMNS: [&str; 2] = ["value", "data"];

/// Errors that can occur when turning a CSV row into an Observation.
#[derive(Debug, PartialEq, Clone)]
pub enum ObservationError {
    /// The header row lacks a required column; the whole file is unusable.
    MissingColumn(&'static str),
    /// A row is shorter than the header.
    MissingField(&'static str),
    /// The date or hour cell could not be parsed.
    Timestamp(DateError),
}

impl fmt::Display for ObservationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationError::MissingColumn(name) => write!(f, "missing '{}' column", name),
            ObservationError::MissingField(name) => write!(f, "row has no '{}' field", name),
            ObservationError::Timestamp(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ObservationError {}

impl From<DateError> for ObservationError {
    fn from(value: DateError) -> Self {
        ObservationError::Timestamp(value)
    }
}

/// Positions of the required columns in a station CSV.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ColumnIndex {
    pub date: usize,
    pub hour: usize,
    pub value: usize,
}

impl ColumnIndex {
    pub fn from_headers(headers: &StringRecord) -> Result<ColumnIndex, ObservationError> {
        let find = |names: &[&str], label: &'static str| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
                .ok_or(ObservationError::MissingColumn(label))
        };
        Ok(ColumnIndex {
            date: find(&DATE_COLUMNS[..], "date")?,
            hour: find(&HOUR_COLUMNS[..], "hour")?,
            value: find(&VALUE_COLUMNS[..], "value")?,
        })
    }
}

/// One reading at a station: identity is (station, series key, date, hour).
///
/// There is no ordering on the type itself; sort by `timestamp`.
#[derive(Debug, Clone)]
pub struct Observation {
    pub station: String,
    pub key: SeriesKey,
    pub date: NaiveDate,
    /// Hour label exactly as it appeared in the file.
    pub hour: String,
    /// date + hour
    pub timestamp: NaiveDateTime,
    /// `timestamp` projected onto the reference year.
    pub month_day: NaiveDateTime,
    pub year: i32,
    /// Blank or non-numeric cells are missing.
    pub value: Option<f64>,
}

impl Observation {
    /// Build an Observation from raw cell text. Fails only when the date or
    /// hour is unusable; a bad value becomes a missing value.
    pub fn from_fields(
        station: &str,
        key: SeriesKey,
        date: &str,
        hour: &str,
        value: &str,
    ) -> Result<Observation, ObservationError> {
        let timestamp = dates::combine(date, hour)?;
        Ok(Observation::at(station, key, timestamp, hour.trim(), parse_value(value)))
    }

    /// Build an Observation from an already-combined timestamp.
    pub fn at(
        station: &str,
        key: SeriesKey,
        timestamp: NaiveDateTime,
        hour: &str,
        value: Option<f64>,
    ) -> Observation {
        Observation {
            station: station.to_string(),
            key,
            date: timestamp.date(),
            hour: hour.to_string(),
            timestamp,
            month_day: MonthDay::from(timestamp).as_naive_datetime(),
            year: timestamp.year(),
            value,
        }
    }

    /// Parse one CSV record using a previously resolved column layout.
    pub fn from_record(
        record: &StringRecord,
        columns: &ColumnIndex,
        station: &str,
        key: SeriesKey,
    ) -> Result<Observation, ObservationError> {
        let date = record
            .get(columns.date)
            .ok_or(ObservationError::MissingField("date"))?;
        let hour = record
            .get(columns.hour)
            .ok_or(ObservationError::MissingField("hour"))?;
        // a short row is treated as a blank reading
        let value = record.get(columns.value).unwrap_or("");
        Observation::from_fields(station, key, date, hour, value)
    }

    pub fn month_day(&self) -> MonthDay {
        MonthDay::from(self.timestamp)
    }
}

/// Parse a measurement cell. Blank, non-numeric and non-finite cells are missing.
pub fn parse_value(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

impl Hash for Observation {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.station.hash(state);
        self.key.hash(state);
        self.date.hash(state);
        self.hour.hash(state);
    }
}

impl Eq for Observation {}

impl PartialEq for Observation {
    fn eq(&self, other: &Self) -> bool {
        self.station == other.station
            && self.key == other.key
            && self.date == other.date
            && self.hour == other.hour
    }
}
