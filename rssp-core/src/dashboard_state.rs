//! Selector state for the dashboard controls.
//!
//! `DashboardState` holds the current value of every control and applies the
//! same cascading resets the selectors do: a new analysis type selects that
//! type's default station, and a new station selects its first geochemical
//! parameter. Call [`DashboardState::view_config`] to get what to render.

use crate::{
    analysis::{AnalysisType, GeoParameter},
    station::{Station, StationRegistry},
    view::{ModeToggle, Stride, ViewConfig, ViewError},
};

#[derive(Debug, Clone)]
pub struct DashboardState<'r> {
    registry: &'r StationRegistry,
    pub analysis: AnalysisType,
    pub station: String,
    pub parameter: Option<GeoParameter>,
    pub stride: Stride,
    pub toggle: ModeToggle,
}

impl<'r> DashboardState<'r> {
    /// Start on underground water level at its default station.
    pub fn new(registry: &'r StationRegistry) -> Self {
        let mut state = Self {
            registry,
            analysis: AnalysisType::Wat,
            station: String::new(),
            parameter: None,
            stride: Stride::All,
            toggle: ModeToggle::default(),
        };
        state.select_analysis(AnalysisType::Wat);
        state
    }

    /// Stations offered for the current analysis type.
    pub fn station_options(&self) -> Vec<&'r Station> {
        self.registry.stations_for(self.analysis).collect()
    }

    /// Parameters offered for the current station; empty outside GEO.
    pub fn parameter_options(&self) -> &'static [GeoParameter] {
        if self.analysis.requires_parameter() {
            GeoParameter::available_at(&self.station)
        } else {
            &[]
        }
    }

    pub fn select_analysis(&mut self, analysis: AnalysisType) {
        self.analysis = analysis;
        let station = self
            .registry
            .default_station(analysis)
            .map(|s| s.code.clone())
            .unwrap_or_default();
        self.select_station(&station);
    }

    pub fn select_station(&mut self, station: &str) {
        self.station = station.to_string();
        self.parameter = self.parameter_options().first().copied();
    }

    pub fn select_parameter(&mut self, parameter: GeoParameter) {
        self.parameter = Some(parameter);
    }

    pub fn select_stride(&mut self, stride: Stride) {
        self.stride = stride;
    }

    pub fn press_toggle(&mut self) {
        self.toggle.toggle();
    }

    pub fn view_config(&self) -> Result<ViewConfig, ViewError> {
        ViewConfig::new(
            self.registry,
            self.analysis,
            &self.station,
            self.parameter,
            self.stride,
            self.toggle.mode(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::DashboardState;
    use crate::analysis::{AnalysisType, GeoParameter};
    use crate::station::StationRegistry;
    use crate::view::{Stride, ViewMode};

    #[test]
    fn test_initial_state() {
        let registry = StationRegistry::embedded().unwrap();
        let state = DashboardState::new(&registry);
        let config = state.view_config().unwrap();
        assert_eq!(config.analysis, AnalysisType::Wat);
        assert_eq!(config.station, "ARTA");
        assert_eq!(config.parameter, None);
        assert_eq!(config.stride, Stride::All);
        assert_eq!(config.mode, ViewMode::Continuous);
        assert_eq!(state.station_options().len(), 13);
        assert!(state.parameter_options().is_empty());
    }

    #[test]
    fn test_analysis_change_resets_station_and_parameter() {
        let registry = StationRegistry::embedded().unwrap();
        let mut state = DashboardState::new(&registry);
        state.select_analysis(AnalysisType::Geo);
        assert_eq!(state.station, "ARAR");
        assert_eq!(state.parameter, Some(GeoParameter::Ca));

        state.select_station("STIP");
        state.select_parameter(GeoParameter::No3);
        assert_eq!(state.view_config().unwrap().title(), "STIP NO3 ANALYSIS");

        state.select_station("KADJ");
        assert_eq!(state.parameter, Some(GeoParameter::Ca));

        state.select_analysis(AnalysisType::Mag);
        assert_eq!(state.station, "HOVT");
        assert_eq!(state.parameter, None);
    }

    #[test]
    fn test_toggle_and_stride_carry_into_config() {
        let registry = StationRegistry::embedded().unwrap();
        let mut state = DashboardState::new(&registry);
        state.select_stride(Stride::Every5);
        state.press_toggle();
        let config = state.view_config().unwrap();
        assert_eq!(config.mode, ViewMode::Yearly);
        assert_eq!(config.stride.get(), 5);
        state.press_toggle();
        assert_eq!(state.view_config().unwrap().mode, ViewMode::Continuous);
    }
}
