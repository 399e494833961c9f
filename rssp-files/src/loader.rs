//! Loading station CSV files into Observations.
//!
//! Each data file has a header row with at least `date`, `hour` and `value`
//! columns (any order, any case; `data` is accepted for `value`). Rows are
//! handled leniently, files strictly:
//!
//! - a file that does not exist is skipped
//! - a row whose date or hour cannot be parsed is dropped and counted
//! - a blank or non-numeric value is kept as a missing value
//! - a file that cannot be read, lacks a required column or is not valid
//!   CSV is excluded as a whole and recorded in the [`LoadReport`]

use crate::DataDir;
use anyhow::Context;
use rssp_core::analysis::SeriesKey;
use rssp_core::observation::{ColumnIndex, Observation};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Read};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Observations read from one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileObservations {
    pub path: PathBuf,
    pub year_tag: u32,
    pub observations: Vec<Observation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// What happened to every candidate file of one load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub loaded: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub excluded: Vec<ExcludedFile>,
    pub dropped_rows: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.excluded.is_empty() && self.dropped_rows == 0
    }
}

/// Parse a whole CSV stream. Returns the Observations and the number of
/// dropped rows, or an error if the stream as a whole is unusable.
pub fn read_observations<R: Read>(
    reader: R,
    station: &str,
    key: SeriesKey,
) -> anyhow::Result<(Vec<Observation>, usize)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = ColumnIndex::from_headers(rdr.headers()?)?;

    let mut observations = Vec::new();
    let mut dropped = 0usize;
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        match Observation::from_record(&record, &columns, station, key) {
            Ok(observation) => observations.push(observation),
            Err(e) => {
                log::debug!("loader: dropping row {:?}: {}", record.position(), e);
                dropped += 1;
            }
        }
    }
    Ok((observations, dropped))
}

impl DataDir {
    /// Read one file. `Ok(None)` means the file does not exist.
    pub fn load_file(
        &self,
        path: &Path,
        station: &str,
        key: SeriesKey,
    ) -> anyhow::Result<Option<(Vec<Observation>, usize)>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to open {}", path.display()))
            }
        };
        let parsed = read_observations(file, station, key)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Some(parsed))
    }

    /// Load every existing file for a station and series key over a range of
    /// two-digit year tags, in year order.
    ///
    /// Never fails: missing and broken files are listed in the report and
    /// contribute nothing to the result.
    pub fn load_files(
        &self,
        station: &str,
        key: SeriesKey,
        years: RangeInclusive<u32>,
    ) -> (Vec<FileObservations>, LoadReport) {
        let mut files = Vec::new();
        let mut report = LoadReport::default();

        for (year_tag, path) in self.resolve(station, key, years) {
            match self.load_file(&path, station, key) {
                Ok(None) => {
                    log::debug!("loader: no file {}", path.display());
                    report.missing.push(path);
                }
                Ok(Some((observations, dropped))) => {
                    if dropped > 0 {
                        log::warn!(
                            "loader: dropped {} rows with unusable date/hour in {}",
                            dropped,
                            path.display()
                        );
                    }
                    report.dropped_rows += dropped;
                    report.loaded.push(path.clone());
                    files.push(FileObservations {
                        path,
                        year_tag,
                        observations,
                    });
                }
                Err(e) => {
                    log::warn!("loader: excluding {}: {:#}", path.display(), e);
                    report.excluded.push(ExcludedFile {
                        path,
                        reason: format!("{:#}", e),
                    });
                }
            }
        }

        log::info!(
            "loader: {} {}: loaded {} files ({} rows), {} missing, {} excluded",
            station,
            key.display_code(),
            report.loaded.len(),
            files.iter().map(|f| f.observations.len()).sum::<usize>(),
            report.missing.len(),
            report.excluded.len()
        );
        (files, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rssp_core::analysis::{AnalysisType, GeoParameter};
    use std::fs;

    fn wat() -> SeriesKey {
        SeriesKey::new(AnalysisType::Wat, None)
    }

    /// Helper to create a data directory with three years for ARTA.
    fn sample_dir() -> (tempfile::TempDir, DataDir) {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("ARTA21_WAT.csv"),
            "date,hour,value\n2021-01-01,00:00,1.5\n2021-01-01,01:00,\n2021-01-01,xx,2.0\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("ARTA22_WAT.csv"),
            "Hour,Date,Data\n00:00,2022-01-01,3.0\n01:00,2022-01-01,4.0\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("ARTA23_WAT.csv"),
            "date,value\n2023-01-01,5.0\n",
        )
        .unwrap();
        let dir = DataDir::new(tmp.path());
        (tmp, dir)
    }

    #[test]
    fn read_observations_keeps_blank_values_and_drops_bad_hours() {
        let csv = "date,hour,value\n2021-03-01,00:00,7\n2021-03-01,01:00,n/a\nbad,02:00,1\n\n";
        let (observations, dropped) = read_observations(csv.as_bytes(), "ARTA", wat()).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[1].value, None);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn read_observations_rejects_missing_columns() {
        let csv = "date,value\n2021-03-01,7\n";
        assert!(read_observations(csv.as_bytes(), "ARTA", wat()).is_err());
    }

    #[test]
    fn load_files_skips_missing_and_excludes_broken() {
        let (_tmp, dir) = sample_dir();
        let (files, report) = dir.load_files("ARTA", wat(), 20..=24);

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].year_tag, 21);
        assert_eq!(files[0].observations.len(), 2);
        assert_eq!(files[1].observations.len(), 2);

        assert_eq!(report.loaded.len(), 2);
        assert_eq!(report.missing.len(), 2);
        assert_eq!(report.excluded.len(), 1);
        assert!(report.excluded[0].path.ends_with("ARTA23_WAT.csv"));
        assert!(report.excluded[0].reason.contains("hour"));
        assert_eq!(report.dropped_rows, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn load_files_on_empty_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = DataDir::new(tmp.path());
        let key = SeriesKey::new(AnalysisType::Geo, Some(GeoParameter::Hco));
        let (files, report) = dir.load_files("ARAR", key, 21..=30);
        assert!(files.is_empty());
        assert_eq!(report.missing.len(), 10);
        assert!(report.is_clean());
    }

    #[test]
    fn load_file_reports_absence_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = DataDir::new(tmp.path());
        let path = dir.path_for("ARTA", 21, wat());
        assert!(dir.load_file(&path, "ARTA", wat()).unwrap().is_none());
    }
}
