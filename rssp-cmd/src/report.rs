//! Plain listings: latest readings per file and the station registry.

use crate::{write_json, DashboardConfig};
use anyhow::Context;
use rssp_core::analysis::{AnalysisType, GeoParameter};
use rssp_core::station::StationRegistry;
use rssp_files::models::LatestGroup;
use std::fmt::Write as _;
use std::io::{self, Write};

pub fn run_latest(config: &DashboardConfig, year: u32, json: bool) -> anyhow::Result<()> {
    let groups = config.data_dir().latest_readings(year)?;
    if json {
        return write_json(&groups, None, true);
    }
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", latest_table(&groups))?;
    Ok(())
}

/// Text table of latest readings, one block per analysis type.
pub fn latest_table(groups: &[LatestGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{} ({})", group.analysis.label(), group.analysis);
        for r in &group.readings {
            let value = r.value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "  {:<4} {:<4} {} {:>8} {:>10}",
                r.station, r.series, r.date, r.hour, value
            );
        }
    }
    out
}

pub fn run_stations(analysis: Option<AnalysisType>) -> anyhow::Result<()> {
    let registry = StationRegistry::embedded().context("station registry is invalid")?;
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", stations_table(&registry, analysis))?;
    Ok(())
}

/// Registry listing; the default station is starred and GEO stations list
/// their sampled parameters.
pub fn stations_table(registry: &StationRegistry, analysis: Option<AnalysisType>) -> String {
    let mut out = String::new();
    let selected: Vec<AnalysisType> = match analysis {
        Some(a) => vec![a],
        None => AnalysisType::ALL.to_vec(),
    };
    for analysis in selected {
        let _ = writeln!(out, "{} ({}) [{}]", analysis.label(), analysis, analysis.y_axis_title());
        for station in registry.stations_for(analysis) {
            let marker = if station.is_default { "*" } else { " " };
            let _ = write!(out, " {}{:<4} {}", marker, station.code, station.name);
            if analysis.requires_parameter() {
                let params: Vec<&str> = GeoParameter::available_at(&station.code)
                    .iter()
                    .map(|p| p.label())
                    .collect();
                let _ = write!(out, " [{}]", params.join(", "));
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rssp_files::models::LatestReading;

    #[test]
    fn stations_table_marks_defaults() {
        let registry = StationRegistry::embedded().unwrap();
        let table = stations_table(&registry, Some(AnalysisType::Rad));
        assert!(table.starts_with(AnalysisType::Rad.label()));
        assert!(table.contains(" *PARA"));
        assert_eq!(table.lines().count(), 1 + 18);
    }

    #[test]
    fn stations_table_lists_geo_parameters() {
        let registry = StationRegistry::embedded().unwrap();
        let table = stations_table(&registry, Some(AnalysisType::Geo));
        assert!(table.contains("HCO3"));
        let all = stations_table(&registry, None);
        assert_eq!(all.lines().count(), 4 + 13 + 18 + 7 + 8);
    }

    #[test]
    fn latest_table_shows_missing_values_as_dash() {
        let groups = vec![LatestGroup {
            analysis: AnalysisType::Rad,
            readings: vec![LatestReading {
                station: "PARA".to_string(),
                series: "RAD".to_string(),
                file: "PARA22_RAD.csv".to_string(),
                date: "2022-06-01".to_string(),
                hour: "00:00".to_string(),
                value: None,
            }],
        }];
        let table = latest_table(&groups);
        assert_eq!(table.lines().count(), 2);
        assert!(table.lines().nth(1).unwrap().trim_end().ends_with('-'));
    }
}
