use crate::analysis::AnalysisType;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Embedded station registry: `ANALYSIS,ID,NAME,DEFAULT`.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/stations.csv");

/// A fixed monitoring location registered for one analysis type.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Station {
    pub analysis: AnalysisType,
    /// Four-letter station code used in file names (e.g. "ARTA").
    pub code: String,
    pub name: String,
    /// True for the station preselected when its analysis type is chosen.
    pub is_default: bool,
}

/// Problems found while parsing or validating the registry.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RegistryError {
    Csv(String),
    UnknownAnalysis(String),
    InvalidCode(String),
    Duplicate(AnalysisType, String),
    DefaultCount(AnalysisType, usize),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Csv(e) => write!(f, "station registry is not valid CSV: {}", e),
            RegistryError::UnknownAnalysis(code) => {
                write!(f, "station registry names unknown analysis '{}'", code)
            }
            RegistryError::InvalidCode(code) => {
                write!(f, "station code '{}' is not four uppercase letters", code)
            }
            RegistryError::Duplicate(analysis, code) => {
                write!(f, "station {} registered twice for {}", code, analysis)
            }
            RegistryError::DefaultCount(analysis, count) => write!(
                f,
                "{} must have exactly one default station, found {}",
                analysis, count
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// All stations, grouped by analysis type in fixture order.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRegistry {
    stations: Vec<Station>,
}

impl StationRegistry {
    /// Parse and validate the embedded registry.
    pub fn embedded() -> Result<StationRegistry, RegistryError> {
        StationRegistry::parse_station_csv(CSV_OBJECT)
    }

    /// Parse a registry CSV and validate it before handing it out.
    pub fn parse_station_csv(csv_object: &str) -> Result<StationRegistry, RegistryError> {
        let mut stations: Vec<Station> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row.map_err(|e| RegistryError::Csv(e.to_string()))?;
            let analysis_code = record.get(0).unwrap_or("").trim();
            let analysis: AnalysisType = analysis_code
                .parse()
                .map_err(|_| RegistryError::UnknownAnalysis(analysis_code.to_string()))?;
            let code = record.get(1).unwrap_or("").trim().to_string();
            let name = record.get(2).unwrap_or("").trim().to_string();
            let is_default = matches!(
                record.get(3).map(|s| s.trim().to_uppercase()).as_deref(),
                Some("Y") | Some("YES") | Some("TRUE")
            );
            stations.push(Station {
                analysis,
                code,
                name,
                is_default,
            });
        }
        let registry = StationRegistry { stations };
        registry.validate()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let mut seen: HashSet<(AnalysisType, &str)> = HashSet::new();
        for station in &self.stations {
            if !is_station_code(&station.code) {
                return Err(RegistryError::InvalidCode(station.code.clone()));
            }
            if !seen.insert((station.analysis, station.code.as_str())) {
                return Err(RegistryError::Duplicate(
                    station.analysis,
                    station.code.clone(),
                ));
            }
        }
        for analysis in AnalysisType::ALL {
            let defaults = self
                .stations_for(analysis)
                .filter(|s| s.is_default)
                .count();
            if defaults != 1 {
                return Err(RegistryError::DefaultCount(analysis, defaults));
            }
        }
        Ok(())
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn stations_for(&self, analysis: AnalysisType) -> impl Iterator<Item = &Station> + '_ {
        self.stations.iter().filter(move |s| s.analysis == analysis)
    }

    pub fn find(&self, analysis: AnalysisType, code: &str) -> Option<&Station> {
        self.stations_for(analysis).find(|s| s.code == code)
    }

    pub fn contains(&self, analysis: AnalysisType, code: &str) -> bool {
        self.find(analysis, code).is_some()
    }

    /// Preselected station for an analysis type. Validation guarantees one exists.
    pub fn default_station(&self, analysis: AnalysisType) -> Option<&Station> {
        self.stations_for(analysis).find(|s| s.is_default)
    }
}

/// Station codes are exactly four ASCII uppercase letters.
pub fn is_station_code(code: &str) -> bool {
    code.len() == 4 && code.chars().all(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::{is_station_code, RegistryError, StationRegistry};
    use crate::analysis::AnalysisType;

    #[test]
    fn test_embedded_registry() {
        let registry = StationRegistry::embedded().unwrap();
        assert_eq!(registry.stations_for(AnalysisType::Wat).count(), 13);
        assert_eq!(registry.stations_for(AnalysisType::Rad).count(), 18);
        assert_eq!(registry.stations_for(AnalysisType::Mag).count(), 7);
        assert_eq!(registry.stations_for(AnalysisType::Geo).count(), 8);
        assert_eq!(registry.default_station(AnalysisType::Wat).unwrap().code, "ARTA");
        assert_eq!(registry.default_station(AnalysisType::Rad).unwrap().code, "PARA");
        assert_eq!(registry.default_station(AnalysisType::Mag).unwrap().code, "HOVT");
        assert_eq!(registry.default_station(AnalysisType::Geo).unwrap().code, "ARAR");
    }

    #[test]
    fn test_same_code_under_several_analyses() {
        let registry = StationRegistry::embedded().unwrap();
        assert!(registry.contains(AnalysisType::Wat, "KARC"));
        assert!(registry.contains(AnalysisType::Geo, "KARC"));
        assert!(!registry.contains(AnalysisType::Mag, "PARA"));
    }

    #[test]
    fn test_rejects_bad_code() {
        let csv = "ANALYSIS,ID,NAME,DEFAULT\nWAT,ART,ARTASHAT,Y\n";
        assert_eq!(
            StationRegistry::parse_station_csv(csv),
            Err(RegistryError::InvalidCode("ART".to_string()))
        );
    }

    #[test]
    fn test_rejects_duplicate() {
        let csv = "ANALYSIS,ID,NAME,DEFAULT\nWAT,ARTA,ARTASHAT,Y\nWAT,ARTA,AGAIN,\n";
        assert_eq!(
            StationRegistry::parse_station_csv(csv),
            Err(RegistryError::Duplicate(AnalysisType::Wat, "ARTA".to_string()))
        );
    }

    #[test]
    fn test_rejects_missing_default() {
        let csv = "ANALYSIS,ID,NAME,DEFAULT\n\
WAT,ARTA,ARTASHAT,Y\nRAD,PARA,PARAKAR,Y\nMAG,HOVT,HOVIT,\nGEO,ARAR,ARARAT,Y\n";
        assert_eq!(
            StationRegistry::parse_station_csv(csv),
            Err(RegistryError::DefaultCount(AnalysisType::Mag, 0))
        );
    }

    #[test]
    fn test_station_code_shape() {
        assert!(is_station_code("ARTA"));
        assert!(!is_station_code("arta"));
        assert!(!is_station_code("ART1"));
        assert!(!is_station_code("ARTAS"));
    }
}
