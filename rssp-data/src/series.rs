//! Series Builder: turns a Station Series into the chart payload handed to
//! the renderer.
//!
//! One line series and one reference line are produced per Year Group. In
//! continuous mode every point's x is its month-day timestamp, so all years
//! share one axis; in yearly mode x is the absolute timestamp. The
//! reference line runs from the group's first to last x at the group's
//! reference statistic.

use crate::statistics::ReferenceStatistic;
use chrono::NaiveDateTime;
use rssp_core::view::{ViewConfig, ViewMode};
use rssp_core::year_group::{StationSeries, YearGroup};
use rssp_utils::dates::format_timestamp;
use serde::Serialize;

pub const DEFAULT_PALETTE: [&str; 3] = ["#117733", "#322288", "#882225"];
pub const DEFAULT_BASE_YEAR: i32 = 2021;
pub const REFERENCE_LINE_COLOR: &str = "red";
pub const REFERENCE_LINE_DASH: &str = "dash";
pub const ANNOTATION: &str = "REGIONAL SURVEY FOR SEISMIC PROTECTION";

/// Rendering choices that stay fixed for the whole session.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesOptions {
    pub statistic: ReferenceStatistic,
    pub palette: Vec<String>,
    pub base_year: i32,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            statistic: ReferenceStatistic::default(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            base_year: DEFAULT_BASE_YEAR,
        }
    }
}

impl SeriesOptions {
    /// Color of a year: `(year - base_year) mod palette size`. An empty
    /// palette falls back to the default one.
    pub fn color_for(&self, year: i32) -> &str {
        if self.palette.is_empty() {
            return DEFAULT_PALETTE[color_index(year, self.base_year, DEFAULT_PALETTE.len())];
        }
        &self.palette[color_index(year, self.base_year, self.palette.len())]
    }
}

/// Palette slot of a year. `len` must be non-zero.
pub fn color_index(year: i32, base_year: i32, len: usize) -> usize {
    (year - base_year).rem_euclid(len as i32) as usize
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: NaiveDateTime,
    /// `None` is drawn as a gap.
    pub y: Option<f64>,
    /// Absolute timestamp, shown on hover.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub year: i32,
    pub color: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub name: String,
    pub year: i32,
    pub statistic: ReferenceStatistic,
    pub x0: NaiveDateTime,
    pub x1: NaiveDateTime,
    pub y: f64,
    pub color: String,
    pub dash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    pub tick_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub title: String,
    pub mode: ViewMode,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<LineSeries>,
    pub reference_lines: Vec<ReferenceLine>,
    pub annotation: String,
}

impl ChartPayload {
    /// Payload with titles and axes but nothing to draw.
    pub fn empty(config: &ViewConfig) -> Self {
        let x_title = match config.mode {
            ViewMode::Continuous => "Month-Day",
            ViewMode::Yearly => "Date",
        };
        Self {
            title: config.title(),
            mode: config.mode,
            x_axis: Axis {
                title: x_title.to_string(),
                tick_format: config.mode.x_tick_format().to_string(),
            },
            y_axis: Axis {
                title: config.analysis.y_axis_title().to_string(),
                tick_format: String::new(),
            },
            series: Vec::new(),
            reference_lines: Vec::new(),
            annotation: ANNOTATION.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

fn x_of(mode: ViewMode, timestamp: NaiveDateTime, month_day: NaiveDateTime) -> NaiveDateTime {
    match mode {
        ViewMode::Continuous => month_day,
        ViewMode::Yearly => timestamp,
    }
}

/// Line series for one Year Group.
pub fn line_series(config: &ViewConfig, options: &SeriesOptions, group: &YearGroup) -> LineSeries {
    let points = group
        .observations
        .iter()
        .map(|o| SeriesPoint {
            x: x_of(config.mode, o.timestamp, o.month_day),
            y: o.value,
            label: format_timestamp(&o.timestamp),
        })
        .collect();
    LineSeries {
        name: config.series_name(group.year),
        year: group.year,
        color: options.color_for(group.year).to_string(),
        points,
    }
}

/// Reference line for one Year Group, or `None` when the group has no
/// values to summarise.
pub fn reference_line(
    config: &ViewConfig,
    options: &SeriesOptions,
    group: &YearGroup,
) -> Option<ReferenceLine> {
    let y = options.statistic.compute(&group.values())?;
    let (x0, x1) = match config.mode {
        ViewMode::Continuous => group.month_day_range()?,
        ViewMode::Yearly => group.timestamp_range()?,
    };
    Some(ReferenceLine {
        name: format!(
            "{} {}",
            options.statistic.legend_prefix(),
            config.series_name(group.year)
        ),
        year: group.year,
        statistic: options.statistic,
        x0,
        x1,
        y,
        color: REFERENCE_LINE_COLOR.to_string(),
        dash: REFERENCE_LINE_DASH.to_string(),
    })
}

/// Build the full chart for a resampled Station Series.
pub fn build_chart(config: &ViewConfig, options: &SeriesOptions, series: &StationSeries) -> ChartPayload {
    let mut payload = ChartPayload::empty(config);
    for group in series.partition_by_year() {
        payload.series.push(line_series(config, options, &group));
        if let Some(line) = reference_line(config, options, &group) {
            payload.reference_lines.push(line);
        } else {
            log::debug!("series: {} has no values, no reference line", group.year);
        }
    }
    log::info!(
        "series: {} -> {} series, {} reference lines ({} mode)",
        payload.title,
        payload.series.len(),
        payload.reference_lines.len(),
        config.mode
    );
    payload
}
