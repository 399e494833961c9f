//! Query result model structs.
//!
//! All structs derive `Serialize` so the CLI can print them as JSON.

use rssp_core::analysis::{AnalysisType, SeriesKey};
use serde::Serialize;
use std::path::PathBuf;

/// A data file found in the directory, with its name decomposed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DataFile {
    pub station: String,
    pub year_tag: u32,
    pub key: SeriesKey,
    pub path: PathBuf,
}

/// The most recent row of one data file.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LatestReading {
    pub station: String,
    /// `WAT`, `RAD`, `MAG` or the geochemical parameter code.
    pub series: String,
    pub file: String,
    pub date: String,
    pub hour: String,
    pub value: Option<f64>,
}

/// Latest readings of one analysis type, ordered by station then series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LatestGroup {
    pub analysis: AnalysisType,
    pub readings: Vec<LatestReading>,
}
