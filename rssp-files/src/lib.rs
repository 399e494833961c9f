//! Flat-file data layer for survey station measurements.
//!
//! Every station keeps one CSV per year and measurement under a single data
//! directory, named
//!
//! ```text
//! {STATION}{YY}_{SUFFIX}.csv
//! ```
//!
//! where `SUFFIX` is the analysis code (`WAT`, `RAD`, `MAG`) or, for
//! geochemical files, the three-character parameter extension (`CA_`, `HCO`,
//! `NH4`, ...). [`DataDir`] resolves those names and exposes the loading and
//! listing operations built on them.
//!
//! # Usage
//!
//! ```rust,no_run
//! use rssp_core::analysis::{AnalysisType, SeriesKey};
//! use rssp_files::DataDir;
//!
//! let dir = DataDir::new("data");
//! let key = SeriesKey::new(AnalysisType::Wat, None);
//! let (files, report) = dir.load_files("ARTA", key, 21..=23);
//! println!("{} files, {} rows dropped", files.len(), report.dropped_rows);
//! ```

pub mod convert;
mod loader;
pub mod models;
mod queries;

pub use loader::{read_observations, ExcludedFile, FileObservations, LoadReport};

use anyhow::bail;
use once_cell::sync::Lazy;
use regex::Regex;
use rssp_core::analysis::SeriesKey;
use rssp_core::station::is_station_code;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

static DATA_FILE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{4})(\d{2})_([A-Z0-9_]{3})\.csv$").unwrap());

/// A directory of per-station, per-year CSV files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

/// A file name decomposed into its station, year tag and series key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFileName {
    pub station: String,
    pub year_tag: u32,
    pub key: SeriesKey,
}

impl DataFileName {
    /// Parse `ARTA21_WAT.csv` style names. Returns `None` for anything else,
    /// including suffixes that name no known measurement.
    pub fn parse(file_name: &str) -> Option<DataFileName> {
        let caps = DATA_FILE_NAME.captures(file_name)?;
        let key = SeriesKey::from_file_suffix(&caps[3])?;
        Some(DataFileName {
            station: caps[1].to_string(),
            year_tag: caps[2].parse().ok()?,
            key,
        })
    }

    pub fn file_name(&self) -> String {
        file_name(&self.station, self.year_tag, self.key)
    }
}

/// Build the file name for one station, two-digit year tag and series key.
pub fn file_name(station: &str, year_tag: u32, key: SeriesKey) -> String {
    format!(
        "{}{:02}_{}.csv",
        station.to_uppercase(),
        year_tag % 100,
        key.file_suffix()
    )
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, station: &str, year_tag: u32, key: SeriesKey) -> PathBuf {
        self.root.join(file_name(station, year_tag, key))
    }

    /// Like [`DataDir::path_for`], for station codes taken from user input:
    /// anything but four ASCII letters is rejected, so the path stays inside
    /// the directory.
    pub fn checked_path_for(
        &self,
        station: &str,
        year_tag: u32,
        key: SeriesKey,
    ) -> anyhow::Result<PathBuf> {
        let code = station.trim().to_uppercase();
        if !is_station_code(&code) {
            bail!("'{}' is not a four-letter station code", station);
        }
        Ok(self.path_for(&code, year_tag, key))
    }

    /// Candidate paths for a station over a year-tag range, in year order.
    /// Nothing is checked on disk.
    pub fn resolve(
        &self,
        station: &str,
        key: SeriesKey,
        years: RangeInclusive<u32>,
    ) -> Vec<(u32, PathBuf)> {
        years
            .map(|tag| (tag, self.path_for(station, tag, key)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rssp_core::analysis::{AnalysisType, GeoParameter};

    #[test]
    fn file_names_follow_station_year_suffix() {
        let wat = SeriesKey::new(AnalysisType::Wat, None);
        let ca = SeriesKey::new(AnalysisType::Geo, Some(GeoParameter::Ca));
        let hco = SeriesKey::new(AnalysisType::Geo, Some(GeoParameter::Hco));
        assert_eq!(file_name("arta", 21, wat), "ARTA21_WAT.csv");
        assert_eq!(file_name("ARAR", 5, ca), "ARAR05_CA_.csv");
        assert_eq!(file_name("ARAR", 2022, hco), "ARAR22_HCO.csv");
    }

    #[test]
    fn resolve_covers_the_year_range() {
        let dir = DataDir::new("/data");
        let rad = SeriesKey::new(AnalysisType::Rad, None);
        let paths = dir.resolve("PARA", rad, 21..=23);
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].0, 21);
        assert_eq!(paths[2].1, PathBuf::from("/data/PARA23_RAD.csv"));
    }

    #[test]
    fn checked_paths_reject_non_station_codes() {
        let dir = DataDir::new("/data");
        let wat = SeriesKey::new(AnalysisType::Wat, None);
        assert_eq!(
            dir.checked_path_for("arta", 21, wat).unwrap(),
            PathBuf::from("/data/ARTA21_WAT.csv")
        );
        for bad in ["../X", "AR/A", "ARTAX", "", "AR1A"] {
            assert!(dir.checked_path_for(bad, 21, wat).is_err(), "{:?} accepted", bad);
        }
    }

    #[test]
    fn data_file_names_parse_back() {
        let parsed = DataFileName::parse("KADJ22_NO3.csv").unwrap();
        assert_eq!(parsed.station, "KADJ");
        assert_eq!(parsed.year_tag, 22);
        assert_eq!(parsed.key.parameter, Some(GeoParameter::No3));
        assert_eq!(parsed.file_name(), "KADJ22_NO3.csv");

        assert_eq!(DataFileName::parse("KADJ22_XYZ.csv"), None);
        assert_eq!(DataFileName::parse("KADJ22_WAT.txt"), None);
        assert_eq!(DataFileName::parse("notes.csv"), None);
    }
}
