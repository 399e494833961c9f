use crate::{analysis::SeriesKey, observation::Observation};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Every observation for one station and series key, across years.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSeries {
    pub station: String,
    pub key: SeriesKey,
    pub observations: Vec<Observation>,
}

/// The slice of a [`StationSeries`] that falls in one calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearGroup {
    pub year: i32,
    pub observations: Vec<Observation>,
}

impl StationSeries {
    pub fn new(station: &str, key: SeriesKey, observations: Vec<Observation>) -> StationSeries {
        StationSeries {
            station: station.to_string(),
            key,
            observations,
        }
    }

    pub fn empty(station: &str, key: SeriesKey) -> StationSeries {
        StationSeries::new(station, key, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Stable sort by combined timestamp; rows sharing a timestamp keep file order.
    pub fn sort_by_timestamp(&mut self) {
        self.observations.sort_by_key(|o| o.timestamp);
    }

    /// Split into one group per calendar year, ascending by year.
    ///
    /// The split is total and disjoint: each observation lands in the group
    /// of its own `year`, and the groups keep the series' row order.
    pub fn partition_by_year(&self) -> Vec<YearGroup> {
        let mut years: BTreeMap<i32, Vec<Observation>> = BTreeMap::new();
        for observation in &self.observations {
            years
                .entry(observation.year)
                .or_default()
                .push(observation.clone());
        }
        years
            .into_iter()
            .map(|(year, observations)| YearGroup { year, observations })
            .collect()
    }
}

impl YearGroup {
    /// Present values, in row order.
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().filter_map(|o| o.value).collect()
    }

    /// Earliest and latest absolute timestamps in the group.
    pub fn timestamp_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        min_max(self.observations.iter().map(|o| o.timestamp))
    }

    /// Earliest and latest reference-year timestamps in the group.
    pub fn month_day_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        min_max(self.observations.iter().map(|o| o.month_day))
    }
}

fn min_max(mut iter: impl Iterator<Item = NaiveDateTime>) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x))))
}
