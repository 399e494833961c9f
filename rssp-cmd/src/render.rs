//! The render pass: Loader, Resampler, Series Builder.

use crate::{write_json, DashboardConfig};
use anyhow::Context;
use rssp_core::analysis::{AnalysisType, GeoParameter};
use rssp_core::dashboard_state::DashboardState;
use rssp_core::station::StationRegistry;
use rssp_core::view::{ModeToggle, Stride};
use rssp_data::resample::assemble;
use rssp_data::series::{build_chart, ChartPayload};
use rssp_files::LoadReport;
use std::path::Path;

/// The control values of one render request, as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub analysis: AnalysisType,
    pub station: Option<String>,
    pub parameter: Option<GeoParameter>,
    pub stride: u32,
    pub toggles: u64,
}

/// Apply the request to fresh dashboard state and render it.
pub fn render(
    config: &DashboardConfig,
    registry: &StationRegistry,
    request: &RenderRequest,
) -> anyhow::Result<(ChartPayload, LoadReport)> {
    let mut state = DashboardState::new(registry);
    state.select_analysis(request.analysis);
    if let Some(station) = &request.station {
        state.select_station(&station.to_uppercase());
    }
    if let Some(parameter) = request.parameter {
        state.select_parameter(parameter);
    }
    state.select_stride(Stride::try_from(request.stride)?);
    state.toggle = ModeToggle::with_clicks(request.toggles);
    let view = state.view_config()?;

    let key = view.key();
    let (files, report) = config.data_dir().load_files(&view.station, key, config.years());
    let per_file = files.into_iter().map(|f| f.observations).collect();
    let series = assemble(&view.station, key, per_file, view.stride, config.resample_order);
    let payload = build_chart(&view, &config.series_options(), &series);
    Ok((payload, report))
}

pub fn run_render(
    config: &DashboardConfig,
    request: &RenderRequest,
    output: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    let registry = StationRegistry::embedded().context("station registry is invalid")?;
    let (payload, report) = render(config, &registry, request)?;
    for excluded in &report.excluded {
        log::warn!("Excluded {}: {}", excluded.path.display(), excluded.reason);
    }
    if payload.is_empty() {
        log::warn!("No data for {}; rendering an empty chart", payload.title);
    }
    write_json(&payload, output, pretty)
}
