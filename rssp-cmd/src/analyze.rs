//! Correlation commands.

use crate::{write_json, DashboardConfig};
use anyhow::{bail, Context};
use rssp_core::analysis::{AnalysisType, GeoParameter, SeriesKey};
use rssp_core::observation::Observation;
use rssp_core::station::StationRegistry;
use rssp_data::correlation::{correlate, correlation_matrix, CorrelationMatrix};
use std::path::Path;

/// The series key for a command-line selection; GEO needs a parameter.
fn series_key(analysis: AnalysisType, parameter: Option<GeoParameter>) -> anyhow::Result<SeriesKey> {
    match (analysis.requires_parameter(), parameter) {
        (true, None) => bail!("{} needs --parameter", analysis),
        (false, Some(_)) => bail!("{} does not take --parameter", analysis),
        _ => Ok(SeriesKey::new(analysis, parameter)),
    }
}

/// Observations of one station file, or `None` if there is no file.
fn station_year(
    config: &DashboardConfig,
    station: &str,
    key: SeriesKey,
    year: u32,
) -> anyhow::Result<Option<Vec<Observation>>> {
    let dir = config.data_dir();
    let path = dir.checked_path_for(station, year, key)?;
    Ok(dir.load_file(&path, station, key)?.map(|(observations, _)| observations))
}

/// One side of a correlation: a station and the series read there.
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    pub station: String,
    pub key: SeriesKey,
}

impl Side {
    pub fn new(station: &str, key: SeriesKey) -> Self {
        Self {
            station: station.trim().to_uppercase(),
            key,
        }
    }

    fn label(&self) -> String {
        format!("{} {}", self.station, self.key.display_code())
    }

    fn load(&self, config: &DashboardConfig, year: u32) -> anyhow::Result<Vec<Observation>> {
        station_year(config, &self.station, self.key, year)?
            .with_context(|| format!("no {} file for {} in {:02}", self.key.display_code(), self.station, year))
    }
}

/// Correlate two station series for one year. The sides may be of
/// different analysis types, e.g. water level against radon.
pub fn correlate_stations(
    config: &DashboardConfig,
    year: u32,
    first: &Side,
    second: &Side,
) -> anyhow::Result<Option<f64>> {
    let a = first.load(config, year)?;
    let b = second.load(config, year)?;
    Ok(correlate(&a, &b))
}

/// Command-line selection of the two sides. The second side repeats the
/// first side's series unless `--with-analysis` or `--with-parameter` is given.
pub struct CorrelateRequest<'a> {
    pub analysis: AnalysisType,
    pub parameter: Option<GeoParameter>,
    pub with_analysis: Option<AnalysisType>,
    pub with_parameter: Option<GeoParameter>,
    pub year: u32,
    pub first: &'a str,
    pub second: &'a str,
}

impl CorrelateRequest<'_> {
    pub fn sides(&self) -> anyhow::Result<(Side, Side)> {
        let first_key = series_key(self.analysis, self.parameter)?;
        let second_key = match (self.with_analysis, self.with_parameter) {
            (None, None) => first_key,
            (analysis, parameter) => {
                series_key(analysis.unwrap_or(self.analysis), parameter)?
            }
        };
        Ok((Side::new(self.first, first_key), Side::new(self.second, second_key)))
    }
}

pub fn run_correlate(config: &DashboardConfig, request: &CorrelateRequest) -> anyhow::Result<()> {
    let (first, second) = request.sides()?;
    let year = request.year;
    match correlate_stations(config, year, &first, &second)? {
        Some(r) => println!("{} / {} {:02}: r = {:.4}", first.label(), second.label(), year, r),
        None => println!(
            "{} / {} {:02}: not enough overlapping readings",
            first.label(),
            second.label(),
            year
        ),
    }
    Ok(())
}

/// Matrix over every registry station of the analysis type that has a file
/// for `year`.
pub fn station_matrix(
    config: &DashboardConfig,
    registry: &StationRegistry,
    key: SeriesKey,
    year: u32,
) -> anyhow::Result<CorrelationMatrix> {
    let mut stations = Vec::new();
    for station in registry.stations_for(key.analysis) {
        match station_year(config, &station.code, key, year) {
            Ok(Some(observations)) => stations.push((station.code.clone(), observations)),
            Ok(None) => {}
            Err(e) => log::warn!("Skipping {}: {:#}", station.code, e),
        }
    }
    log::info!(
        "Correlating {} {} stations for {:02}",
        stations.len(),
        key.display_code(),
        year
    );
    Ok(correlation_matrix(key.analysis, year, &stations))
}

pub fn run_matrix(
    config: &DashboardConfig,
    analysis: AnalysisType,
    parameter: Option<GeoParameter>,
    year: u32,
    output: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    let key = series_key(analysis, parameter)?;
    let registry = StationRegistry::embedded().context("station registry is invalid")?;
    let matrix = station_matrix(config, &registry, key, year)?;
    write_json(&matrix, output, pretty)
}
