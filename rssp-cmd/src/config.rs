//! Dashboard configuration, read once at startup from an optional TOML file.
//!
//! ```toml
//! data_dir = "data"
//! first_year = 21
//! last_year = 24
//! base_year = 2021
//! reference_statistic = "median"
//! resample_order = "per_file"
//! palette = ["#117733", "#322288", "#882225"]
//! ```
//!
//! Every key is optional.

use anyhow::{bail, Context};
use rssp_data::resample::ResampleOrder;
use rssp_data::series::{SeriesOptions, DEFAULT_BASE_YEAR, DEFAULT_PALETTE};
use rssp_data::statistics::ReferenceStatistic;
use rssp_files::DataDir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    /// Two-digit year tags searched for station files, inclusive.
    pub first_year: u32,
    pub last_year: u32,
    pub base_year: i32,
    pub reference_statistic: ReferenceStatistic,
    pub resample_order: ResampleOrder,
    pub palette: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            first_year: 21,
            last_year: 30,
            base_year: DEFAULT_BASE_YEAR,
            reference_statistic: ReferenceStatistic::Mean,
            resample_order: ResampleOrder::Combined,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: DashboardConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`, or fall back to the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        log::info!("config: loaded {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.first_year > 99 || self.last_year > 99 {
            bail!("year tags must be two digits, got {}..={}", self.first_year, self.last_year);
        }
        if self.first_year > self.last_year {
            bail!("first_year {} is after last_year {}", self.first_year, self.last_year);
        }
        if self.palette.is_empty() {
            bail!("palette must name at least one color");
        }
        Ok(())
    }

    pub fn years(&self) -> RangeInclusive<u32> {
        self.first_year..=self.last_year
    }

    pub fn data_dir(&self) -> DataDir {
        DataDir::new(&self.data_dir)
    }

    pub fn series_options(&self) -> SeriesOptions {
        SeriesOptions {
            statistic: self.reference_statistic,
            palette: self.palette.clone(),
            base_year: self.base_year,
        }
    }
}
