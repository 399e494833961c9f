//! What to draw: the View Configuration and the continuous/yearly mode selector.
//!
//! A [`ViewConfig`] is rebuilt from the current selections on every render
//! and is never stored.

use crate::{
    analysis::{AnalysisType, GeoParameter, SeriesKey},
    station::StationRegistry,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Down-sampling factor: keep every Nth row.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Stride {
    #[default]
    All,
    Every2,
    Every3,
    Every5,
}

impl Stride {
    pub const ALL: [Stride; 4] = [Stride::All, Stride::Every2, Stride::Every3, Stride::Every5];

    pub fn get(&self) -> usize {
        match self {
            Stride::All => 1,
            Stride::Every2 => 2,
            Stride::Every3 => 3,
            Stride::Every5 => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stride::All => "All",
            Stride::Every2 => "Every 2 days",
            Stride::Every3 => "Every 3 days",
            Stride::Every5 => "Every 5 days",
        }
    }
}

impl TryFrom<u32> for Stride {
    type Error = ViewError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Stride::All),
            2 => Ok(Stride::Every2),
            3 => Ok(Stride::Every3),
            5 => Ok(Stride::Every5),
            other => Err(ViewError::InvalidStride(other)),
        }
    }
}

impl From<Stride> for u32 {
    fn from(value: Stride) -> Self {
        value.get() as u32
    }
}

/// How years are laid out on the x axis.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// All years overlaid on a shared day-of-year axis.
    #[default]
    Continuous,
    /// Each year on its own absolute timeline.
    Yearly,
}

impl ViewMode {
    /// Even toggle counts are continuous, odd ones yearly.
    pub fn from_toggle_count(clicks: u64) -> ViewMode {
        if clicks % 2 == 0 {
            ViewMode::Continuous
        } else {
            ViewMode::Yearly
        }
    }

    pub fn x_tick_format(&self) -> &'static str {
        match self {
            ViewMode::Continuous => "%m-%d",
            ViewMode::Yearly => "%Y-%m-%d",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Continuous => f.write_str("continuous"),
            ViewMode::Yearly => f.write_str("yearly"),
        }
    }
}

/// The toggle button: counts activations, starts in continuous mode.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct ModeToggle {
    clicks: u64,
}

impl ModeToggle {
    pub fn with_clicks(clicks: u64) -> ModeToggle {
        ModeToggle { clicks }
    }

    pub fn toggle(&mut self) -> ViewMode {
        self.clicks = self.clicks.wrapping_add(1);
        self.mode()
    }

    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    pub fn mode(&self) -> ViewMode {
        ViewMode::from_toggle_count(self.clicks)
    }
}

/// Reasons a selection cannot be rendered.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ViewError {
    InvalidStride(u32),
    UnknownStation(AnalysisType, String),
    MissingParameter(String),
    UnexpectedParameter(AnalysisType),
    ParameterNotSampled(String, GeoParameter),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::InvalidStride(n) => {
                write!(f, "stride {} is not one of 1, 2, 3, 5", n)
            }
            ViewError::UnknownStation(analysis, code) => {
                write!(f, "station {} has no {} series", code, analysis)
            }
            ViewError::MissingParameter(code) => {
                write!(f, "geochemical station {} needs a parameter", code)
            }
            ViewError::UnexpectedParameter(analysis) => {
                write!(f, "{} series do not take a parameter", analysis)
            }
            ViewError::ParameterNotSampled(code, parameter) => {
                write!(f, "{} is not sampled at {}", parameter, code)
            }
        }
    }
}

impl std::error::Error for ViewError {}

/// One fully validated render request.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct ViewConfig {
    pub analysis: AnalysisType,
    pub station: String,
    pub parameter: Option<GeoParameter>,
    pub stride: Stride,
    pub mode: ViewMode,
}

impl ViewConfig {
    /// Validate a selection against the station registry.
    pub fn new(
        registry: &StationRegistry,
        analysis: AnalysisType,
        station: &str,
        parameter: Option<GeoParameter>,
        stride: Stride,
        mode: ViewMode,
    ) -> Result<ViewConfig, ViewError> {
        if !registry.contains(analysis, station) {
            return Err(ViewError::UnknownStation(analysis, station.to_string()));
        }
        match (analysis.requires_parameter(), parameter) {
            (true, None) => return Err(ViewError::MissingParameter(station.to_string())),
            (true, Some(p)) if !GeoParameter::available_at(station).contains(&p) => {
                return Err(ViewError::ParameterNotSampled(station.to_string(), p))
            }
            (false, Some(_)) => return Err(ViewError::UnexpectedParameter(analysis)),
            _ => {}
        }
        Ok(ViewConfig {
            analysis,
            station: station.to_string(),
            parameter,
            stride,
            mode,
        })
    }

    pub fn key(&self) -> SeriesKey {
        SeriesKey::new(self.analysis, self.parameter)
    }

    /// Chart title, e.g. "ARTA WAT ANALYSIS" or "ARAR HCO ANALYSIS".
    pub fn title(&self) -> String {
        format!(
            "{} {} ANALYSIS",
            self.station.to_uppercase(),
            self.key().display_code()
        )
    }

    /// Legend name of the line for one year.
    pub fn series_name(&self, year: i32) -> String {
        match self.parameter {
            Some(parameter) if self.analysis == AnalysisType::Geo => {
                format!("{} {} {} ANALYSIS", self.station, parameter.code(), year)
            }
            _ => format!("{} {}", self.station, year),
        }
    }
}
