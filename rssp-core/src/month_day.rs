use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Year every observation is projected onto for the continuous overlay.
/// It is a leap year, so February 29 readings keep their slot.
pub const REFERENCE_YEAR: i32 = 2000;

/// A year-agnostic position in the calendar, down to the second.
///
/// Ordering follows the calendar, so sorting by `MonthDay` lines readings
/// from different years up on one shared axis.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
    pub time: NaiveTime,
}

impl MonthDay {
    pub fn from_md_opt(month: u32, day: u32) -> Option<MonthDay> {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day).map(|_| MonthDay {
            month,
            day,
            time: NaiveTime::default(),
        })
    }

    /// The timestamp in [`REFERENCE_YEAR`] used as the overlay x value.
    pub fn as_naive_datetime(&self) -> NaiveDateTime {
        // month/day were valid in some year, and REFERENCE_YEAR is a leap year
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, self.month, self.day)
            .unwrap_or(NaiveDate::MIN)
            .and_time(self.time)
    }

    /// Zero-based day index on the shared axis (Jan 1 = 0, Dec 31 = 365).
    pub fn day_of_year0(&self) -> u32 {
        self.as_naive_datetime().ordinal0()
    }
}

impl From<NaiveDateTime> for MonthDay {
    fn from(value: NaiveDateTime) -> Self {
        MonthDay {
            month: value.month(),
            day: value.day(),
            time: value
                .time()
                .with_nanosecond(0)
                .unwrap_or_else(|| value.time()),
        }
    }
}

impl From<MonthDay> for NaiveDateTime {
    fn from(value: MonthDay) -> Self {
        value.as_naive_datetime()
    }
}

#[cfg(test)]
mod tests {
    use super::{MonthDay, REFERENCE_YEAR};
    use chrono::{Datelike, NaiveDate, Timelike};

    #[test]
    fn test_normalizes_year_and_keeps_time() {
        let ts = NaiveDate::from_ymd_opt(2022, 7, 14)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap();
        let md: MonthDay = ts.into();
        let normalized = md.as_naive_datetime();
        assert_eq!(normalized.year(), REFERENCE_YEAR);
        assert_eq!(normalized.month(), 7);
        assert_eq!(normalized.day(), 14);
        assert_eq!(normalized.hour(), 13);
    }

    #[test]
    fn test_leap_day_survives_normalization() {
        let ts = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let md = MonthDay::from(ts);
        assert_eq!(md.as_naive_datetime().day(), 29);
        assert_eq!(md.day_of_year0(), 59);
    }

    #[test]
    fn test_same_calendar_slot_across_years() {
        let a = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap().and_hms_opt(5, 0, 0).unwrap();
        let b = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap().and_hms_opt(5, 0, 0).unwrap();
        assert_eq!(MonthDay::from(a), MonthDay::from(b));
    }

    #[test]
    fn test_ordering_follows_calendar() {
        let jan = MonthDay::from_md_opt(1, 31).unwrap();
        let feb = MonthDay::from_md_opt(2, 1).unwrap();
        assert!(jan < feb);
        assert!(MonthDay::from_md_opt(2, 30).is_none());
        assert_eq!(MonthDay::from_md_opt(12, 31).unwrap().day_of_year0(), 365);
    }
}
