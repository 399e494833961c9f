//! Data processing for survey station observations.
//!
//! This crate turns loaded observations into forms suitable for charting and
//! analysis: stride resampling, per-year reference statistics, chart series
//! and station-to-station correlation.

pub mod correlation;
pub mod series;

/// Stride-based down-sampling of observation rows.
pub mod resample {
    use rssp_core::analysis::SeriesKey;
    use rssp_core::observation::Observation;
    use rssp_core::view::Stride;
    use rssp_core::year_group::StationSeries;
    use serde::{Deserialize, Serialize};

    /// When the stride is applied relative to joining the per-year files.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ResampleOrder {
        /// Join all files, sort by timestamp, then keep every Nth row.
        #[default]
        Combined,
        /// Keep every Nth row of each file, then join.
        PerFile,
    }

    /// Keep rows 0, N, 2N, ... A stride of 0 or 1 keeps everything.
    ///
    /// The result has `ceil(len / N)` rows and preserves their order.
    pub fn every_nth<T: Clone>(rows: &[T], stride: usize) -> Vec<T> {
        rows.iter().step_by(stride.max(1)).cloned().collect()
    }

    /// Build one Station Series from per-file observations, applying the
    /// stride in the requested order. The result is in timestamp order.
    pub fn assemble(
        station: &str,
        key: SeriesKey,
        files: Vec<Vec<Observation>>,
        stride: Stride,
        order: ResampleOrder,
    ) -> StationSeries {
        let total: usize = files.iter().map(Vec::len).sum();
        let mut series = match order {
            ResampleOrder::Combined => {
                let mut series = StationSeries::new(station, key, files.concat());
                series.sort_by_timestamp();
                series.observations = every_nth(&series.observations, stride.get());
                series
            }
            ResampleOrder::PerFile => {
                let kept = files
                    .into_iter()
                    .flat_map(|mut rows| {
                        rows.sort_by_key(|o| o.timestamp);
                        every_nth(&rows, stride.get())
                    })
                    .collect();
                StationSeries::new(station, key, kept)
            }
        };
        series.sort_by_timestamp();
        log::debug!(
            "resample: {} {} kept {} of {} rows (stride {}, {:?})",
            station,
            key.display_code(),
            series.len(),
            total,
            stride.get(),
            order
        );
        series
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use rssp_core::analysis::AnalysisType;

        fn obs(date: &str, hour: &str) -> Observation {
            let key = SeriesKey::new(AnalysisType::Mag, None);
            Observation::from_fields("HOVT", key, date, hour, "1").unwrap()
        }

        #[test]
        fn test_every_nth_count_and_first_row() {
            let rows: Vec<u32> = (0..17).collect();
            for stride in [1usize, 2, 3, 5] {
                let kept = every_nth(&rows, stride);
                assert_eq!(kept.len(), rows.len().div_ceil(stride));
                assert_eq!(kept[0], 0);
                assert!(kept.windows(2).all(|w| w[0] < w[1]));
            }
            assert_eq!(every_nth(&rows, 1), rows);
            assert!(every_nth::<u32>(&[], 3).is_empty());
        }

        #[test]
        fn test_combined_resamples_after_joining() {
            let key = SeriesKey::new(AnalysisType::Mag, None);
            let files = vec![
                vec![obs("2022-01-01", "00:00"), obs("2022-01-01", "01:00"), obs("2022-01-01", "02:00")],
                vec![obs("2021-01-01", "00:00"), obs("2021-01-01", "01:00")],
            ];
            let series = assemble("HOVT", key, files, Stride::Every2, ResampleOrder::Combined);
            let hours: Vec<_> = series.observations.iter().map(|o| o.timestamp.to_string()).collect();
            assert_eq!(
                hours,
                vec!["2021-01-01 00:00:00", "2022-01-01 00:00:00", "2022-01-01 02:00:00"]
            );
        }

        #[test]
        fn test_per_file_resamples_each_file() {
            let key = SeriesKey::new(AnalysisType::Mag, None);
            let files = vec![
                vec![obs("2022-01-01", "00:00"), obs("2022-01-01", "01:00"), obs("2022-01-01", "02:00")],
                vec![obs("2021-01-01", "00:00"), obs("2021-01-01", "01:00")],
            ];
            let series = assemble("HOVT", key, files, Stride::Every2, ResampleOrder::PerFile);
            let hours: Vec<_> = series.observations.iter().map(|o| o.timestamp.to_string()).collect();
            assert_eq!(
                hours,
                vec!["2021-01-01 00:00:00", "2022-01-01 00:00:00", "2022-01-01 02:00:00"]
            );
            let single = assemble(
                "HOVT",
                key,
                vec![vec![obs("2021-01-01", "00:00"), obs("2021-01-01", "01:00")], vec![obs("2021-01-01", "02:00")]],
                Stride::Every2,
                ResampleOrder::PerFile,
            );
            assert_eq!(single.len(), 2);
        }

        #[test]
        fn test_stride_one_is_identity() {
            let key = SeriesKey::new(AnalysisType::Mag, None);
            let files = vec![vec![obs("2022-01-01", "00:00"), obs("2022-01-01", "01:00")]];
            let series = assemble("HOVT", key, files.clone(), Stride::All, ResampleOrder::Combined);
            assert_eq!(series.observations, files[0]);
        }
    }
}

/// Reference statistics drawn as a constant line over each year.
pub mod statistics {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ReferenceStatistic {
        #[default]
        Mean,
        Median,
    }

    impl ReferenceStatistic {
        /// The statistic of the values, kept inside `[min, max]`. `None` for
        /// an empty slice.
        pub fn compute(&self, values: &[f64]) -> Option<f64> {
            match self {
                ReferenceStatistic::Mean => mean(values),
                ReferenceStatistic::Median => median(values),
            }
        }

        /// Prefix of the reference line's legend name.
        pub fn legend_prefix(&self) -> &'static str {
            match self {
                ReferenceStatistic::Mean => "Average for",
                ReferenceStatistic::Median => "Median for",
            }
        }
    }

    impl fmt::Display for ReferenceStatistic {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ReferenceStatistic::Mean => f.write_str("mean"),
                ReferenceStatistic::Median => f.write_str("median"),
            }
        }
    }

    /// Arithmetic mean, clamped to the sample range against rounding.
    pub fn mean(values: &[f64]) -> Option<f64> {
        let (min, max) = min_max(values)?;
        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let avg = if sum.is_finite() {
            sum / n
        } else {
            values.iter().map(|v| v / n).sum()
        };
        Some(avg.clamp(min, max))
    }

    /// Median; the mean of the two middle values for even lengths.
    pub fn median(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            // halve first so two large middle values cannot overflow
            Some(sorted[mid - 1] / 2.0 + sorted[mid] / 2.0)
        } else {
            Some(sorted[mid])
        }
    }

    /// Pearson correlation coefficient of paired samples. `None` with fewer
    /// than two pairs, mismatched lengths or a constant side.
    pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }
        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;
        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in xs.iter().zip(ys) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }
        if var_x == 0.0 || var_y == 0.0 {
            return None;
        }
        Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
    }

    fn min_max(values: &[f64]) -> Option<(f64, f64)> {
        let first = *values.first()?;
        Some(
            values
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mean_and_median() {
            assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
            assert_eq!(median(&[6.0, 1.0, 2.0]), Some(2.0));
            assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
            assert_eq!(mean(&[]), None);
            assert_eq!(median(&[1.7e308, 1.7e308]), Some(1.7e308));
            let big = mean(&[1.7e308, 1.5e308]).unwrap();
            assert!((big - 1.6e308).abs() < 1e295);
            assert_eq!(median(&[]), None);
        }

        #[test]
        fn test_statistic_stays_within_range() {
            let samples: [&[f64]; 6] = [
                &[1.7e308, 1.7e308],
                &[-1.7e308, -1.7e308, 5.0, 6.0],
                &[0.1, 0.1, 0.1],
                &[5.0],
                &[-3.0, 7.5, 2.25, 1e9],
                &[1.0, 1.0, 100.0, 100.0],
            ];
            for values in samples {
                let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
                let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                for statistic in [ReferenceStatistic::Mean, ReferenceStatistic::Median] {
                    let v = statistic.compute(values).unwrap();
                    assert!(lo <= v && v <= hi, "{} {} outside [{}, {}]", statistic, v, lo, hi);
                }
            }
        }

        #[test]
        fn test_pearson() {
            let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
            assert!((r - 1.0).abs() < 1e-12);
            let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
            assert!((r + 1.0).abs() < 1e-12);
            assert_eq!(pearson(&[1.0], &[1.0]), None);
            assert_eq!(pearson(&[1.0, 1.0], &[1.0, 2.0]), None);
            assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
        }

        #[test]
        fn test_statistic_serde_names() {
            let s: ReferenceStatistic = serde_json::from_str("\"median\"").unwrap();
            assert_eq!(s, ReferenceStatistic::Median);
            assert_eq!(s.legend_prefix(), "Median for");
        }
    }
}
