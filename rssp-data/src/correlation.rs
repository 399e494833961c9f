//! Station-to-station correlation of readings taken at the same time.

use crate::statistics::pearson;
use chrono::NaiveDateTime;
use rssp_core::analysis::AnalysisType;
use rssp_core::observation::Observation;
use serde::Serialize;
use std::collections::HashMap;

/// Value pairs of two observation sets that share a timestamp and both have
/// a value, in the order of `a`.
pub fn aligned_pairs(a: &[Observation], b: &[Observation]) -> (Vec<f64>, Vec<f64>) {
    let by_time: HashMap<NaiveDateTime, f64> = b
        .iter()
        .filter_map(|o| o.value.map(|v| (o.timestamp, v)))
        .collect();
    a.iter()
        .filter_map(|o| Some((o.value?, *by_time.get(&o.timestamp)?)))
        .unzip()
}

/// Pearson correlation on timestamp-aligned readings.
pub fn correlate(a: &[Observation], b: &[Observation]) -> Option<f64> {
    let (xs, ys) = aligned_pairs(a, b);
    pearson(&xs, &ys)
}

/// Square matrix of pairwise correlations, labels in row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub analysis: AnalysisType,
    pub year_tag: u32,
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == column)?;
        self.values[i][j]
    }
}

/// Correlate every pair of stations. The diagonal is 1.0 wherever the
/// station's own correlation is defined.
pub fn correlation_matrix(
    analysis: AnalysisType,
    year_tag: u32,
    stations: &[(String, Vec<Observation>)],
) -> CorrelationMatrix {
    let n = stations.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        let own = correlate(&stations[i].1, &stations[i].1);
        values[i][i] = own.map(|_| 1.0);
        for j in (i + 1)..n {
            let r = correlate(&stations[i].1, &stations[j].1);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix {
        analysis,
        year_tag,
        labels: stations.iter().map(|(code, _)| code.clone()).collect(),
        values,
    }
}
