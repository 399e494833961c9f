use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Category of monitored phenomenon. The code doubles as the file-name
/// suffix for every type except [`AnalysisType::Geo`], whose files are keyed
/// by [`GeoParameter::file_extension`] instead.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnalysisType {
    Wat,
    Rad,
    Mag,
    Geo,
}

/// Errors raised when parsing analysis or parameter codes.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CodeError {
    UnknownAnalysis(String),
    UnknownParameter(String),
}

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeError::UnknownAnalysis(code) => write!(f, "unknown analysis type '{}'", code),
            CodeError::UnknownParameter(code) => {
                write!(f, "unknown geochemical parameter '{}'", code)
            }
        }
    }
}

impl std::error::Error for CodeError {}

impl AnalysisType {
    pub const ALL: [AnalysisType; 4] = [
        AnalysisType::Wat,
        AnalysisType::Rad,
        AnalysisType::Mag,
        AnalysisType::Geo,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            AnalysisType::Wat => "WAT",
            AnalysisType::Rad => "RAD",
            AnalysisType::Mag => "MAG",
            AnalysisType::Geo => "GEO",
        }
    }

    /// Human-readable label shown in the analysis-type selector.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisType::Wat => "UNDERGROUND WATER LEVEL",
            AnalysisType::Rad => "RADON GAS ANALYSIS",
            AnalysisType::Mag => "MAGNETIC FIELD ANALYSIS",
            AnalysisType::Geo => "GEOCHEMICAL ANALYSIS",
        }
    }

    /// Unit shown on the value axis.
    pub fn y_axis_title(&self) -> &'static str {
        match self {
            AnalysisType::Wat => "H/m",
            AnalysisType::Rad => "C,imp/min",
            AnalysisType::Mag => "n/Tl",
            AnalysisType::Geo => "E-2mg-e/l",
        }
    }

    pub fn requires_parameter(&self) -> bool {
        matches!(self, AnalysisType::Geo)
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AnalysisType {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WAT" => Ok(AnalysisType::Wat),
            "RAD" => Ok(AnalysisType::Rad),
            "MAG" => Ok(AnalysisType::Mag),
            "GEO" => Ok(AnalysisType::Geo),
            other => Err(CodeError::UnknownAnalysis(other.to_string())),
        }
    }
}

/// A measured geochemical parameter.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GeoParameter {
    Ca,
    Cl,
    Eh,
    Hco,
    He,
    K,
    Mg,
    Na,
    Nh4,
    No2,
    No3,
    Ph,
    So4,
    Nak,
    T,
    F,
}

const ACHU_SART_PARAMETERS: [GeoParameter; 8] = [
    GeoParameter::Ca,
    GeoParameter::Cl,
    GeoParameter::Mg,
    GeoParameter::Hco,
    GeoParameter::So4,
    GeoParameter::Nak,
    GeoParameter::Ph,
    GeoParameter::T,
];

const KADJ_PARAMETERS: [GeoParameter; 7] = [
    GeoParameter::Ca,
    GeoParameter::Cl,
    GeoParameter::Hco,
    GeoParameter::Mg,
    GeoParameter::So4,
    GeoParameter::Ph,
    GeoParameter::He,
];

const STIP_PARAMETERS: [GeoParameter; 10] = [
    GeoParameter::Ca,
    GeoParameter::Cl,
    GeoParameter::F,
    GeoParameter::Hco,
    GeoParameter::Mg,
    GeoParameter::Nh4,
    GeoParameter::No2,
    GeoParameter::No3,
    GeoParameter::Ph,
    GeoParameter::So4,
];

const DEFAULT_PARAMETERS: [GeoParameter; 12] = [
    GeoParameter::Ca,
    GeoParameter::Cl,
    GeoParameter::Eh,
    GeoParameter::Hco,
    GeoParameter::He,
    GeoParameter::K,
    GeoParameter::Mg,
    GeoParameter::Na,
    GeoParameter::Nh4,
    GeoParameter::No2,
    GeoParameter::Ph,
    GeoParameter::So4,
];

impl GeoParameter {
    pub const ALL: [GeoParameter; 16] = [
        GeoParameter::Ca,
        GeoParameter::Cl,
        GeoParameter::Eh,
        GeoParameter::Hco,
        GeoParameter::He,
        GeoParameter::K,
        GeoParameter::Mg,
        GeoParameter::Na,
        GeoParameter::Nh4,
        GeoParameter::No2,
        GeoParameter::No3,
        GeoParameter::Ph,
        GeoParameter::So4,
        GeoParameter::Nak,
        GeoParameter::T,
        GeoParameter::F,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            GeoParameter::Ca => "CA",
            GeoParameter::Cl => "CL",
            GeoParameter::Eh => "EH",
            GeoParameter::Hco => "HCO",
            GeoParameter::He => "HE",
            GeoParameter::K => "K",
            GeoParameter::Mg => "MG",
            GeoParameter::Na => "NA",
            GeoParameter::Nh4 => "NH4",
            GeoParameter::No2 => "NO2",
            GeoParameter::No3 => "NO3",
            GeoParameter::Ph => "PH",
            GeoParameter::So4 => "SO4",
            GeoParameter::Nak => "NAK",
            GeoParameter::T => "T",
            GeoParameter::F => "F",
        }
    }

    /// Fixed 3-character code used in place of the analysis suffix in file names.
    pub fn file_extension(&self) -> &'static str {
        match self {
            GeoParameter::Ca => "CA_",
            GeoParameter::Cl => "CL_",
            GeoParameter::Eh => "EH_",
            GeoParameter::Hco => "HCO",
            GeoParameter::He => "HE_",
            GeoParameter::K => "K__",
            GeoParameter::Mg => "MG_",
            GeoParameter::Na => "NA_",
            GeoParameter::Nh4 => "NH4",
            GeoParameter::No2 => "NO2",
            GeoParameter::No3 => "NO3",
            GeoParameter::Ph => "PH_",
            GeoParameter::So4 => "SO4",
            GeoParameter::Nak => "NAK",
            GeoParameter::T => "T__",
            GeoParameter::F => "F__",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GeoParameter::Hco => "HCO3",
            other => other.code(),
        }
    }

    /// Reverse lookup of [`GeoParameter::file_extension`].
    pub fn from_file_extension(extension: &str) -> Option<GeoParameter> {
        GeoParameter::ALL
            .iter()
            .copied()
            .find(|p| p.file_extension() == extension)
    }

    /// Parameters sampled at a geochemical station, default first.
    pub fn available_at(station_code: &str) -> &'static [GeoParameter] {
        match station_code {
            "ACHU" | "SART" => &ACHU_SART_PARAMETERS,
            "KADJ" => &KADJ_PARAMETERS,
            "STIP" => &STIP_PARAMETERS,
            _ => &DEFAULT_PARAMETERS,
        }
    }

    pub fn default_for(station_code: &str) -> GeoParameter {
        GeoParameter::available_at(station_code)[0]
    }
}

impl fmt::Display for GeoParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for GeoParameter {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let lookup = if upper == "HCO3" { "HCO" } else { upper.as_str() };
        GeoParameter::ALL
            .iter()
            .copied()
            .find(|p| p.code() == lookup)
            .ok_or(CodeError::UnknownParameter(upper))
    }
}

/// Identifies which measurement a file holds: the analysis type, plus the
/// parameter when the analysis is geochemical.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct SeriesKey {
    pub analysis: AnalysisType,
    pub parameter: Option<GeoParameter>,
}

impl SeriesKey {
    pub fn new(analysis: AnalysisType, parameter: Option<GeoParameter>) -> SeriesKey {
        SeriesKey {
            analysis,
            parameter,
        }
    }

    /// Suffix after the underscore in `{STATION}{YY}_{SUFFIX}.csv`.
    pub fn file_suffix(&self) -> &'static str {
        match (self.analysis, self.parameter) {
            (AnalysisType::Geo, Some(parameter)) => parameter.file_extension(),
            (analysis, _) => analysis.code(),
        }
    }

    /// Code used in titles and series names: the parameter for GEO,
    /// the analysis code otherwise.
    pub fn display_code(&self) -> &'static str {
        match (self.analysis, self.parameter) {
            (AnalysisType::Geo, Some(parameter)) => parameter.code(),
            (analysis, _) => analysis.code(),
        }
    }

    /// Inverse of [`SeriesKey::file_suffix`].
    pub fn from_file_suffix(suffix: &str) -> Option<SeriesKey> {
        if let Ok(analysis) = suffix.parse::<AnalysisType>() {
            if analysis != AnalysisType::Geo {
                return Some(SeriesKey::new(analysis, None));
            }
        }
        GeoParameter::from_file_extension(suffix)
            .map(|parameter| SeriesKey::new(AnalysisType::Geo, Some(parameter)))
    }
}

#[cfg(test)]
mod tests {
    use super::{AnalysisType, GeoParameter, SeriesKey};
    use std::collections::HashSet;

    #[test]
    fn test_analysis_codes_round_trip_through_from_str() {
        for analysis in AnalysisType::ALL {
            assert_eq!(analysis.code().parse::<AnalysisType>().unwrap(), analysis);
        }
        assert_eq!("rad".parse::<AnalysisType>().unwrap(), AnalysisType::Rad);
        assert!("SNOW".parse::<AnalysisType>().is_err());
    }

    #[test]
    fn test_file_extensions_are_three_characters_and_unique() {
        let mut seen = HashSet::new();
        for parameter in GeoParameter::ALL {
            assert_eq!(parameter.file_extension().len(), 3, "{:?}", parameter);
            assert!(seen.insert(parameter.file_extension()));
            assert_eq!(
                GeoParameter::from_file_extension(parameter.file_extension()),
                Some(parameter)
            );
        }
    }

    #[test]
    fn test_hco3_label_and_parse() {
        assert_eq!(GeoParameter::Hco.label(), "HCO3");
        assert_eq!("HCO3".parse::<GeoParameter>().unwrap(), GeoParameter::Hco);
        assert_eq!("hco".parse::<GeoParameter>().unwrap(), GeoParameter::Hco);
    }

    #[test]
    fn test_station_parameter_lists() {
        assert_eq!(GeoParameter::available_at("ACHU").len(), 8);
        assert_eq!(GeoParameter::available_at("SART"), GeoParameter::available_at("ACHU"));
        assert!(GeoParameter::available_at("KADJ").contains(&GeoParameter::He));
        assert!(GeoParameter::available_at("STIP").contains(&GeoParameter::No3));
        assert!(!GeoParameter::available_at("ARAR").contains(&GeoParameter::No3));
        assert_eq!(GeoParameter::default_for("ARAR"), GeoParameter::Ca);
    }

    #[test]
    fn test_axis_titles() {
        assert_eq!(AnalysisType::Wat.y_axis_title(), "H/m");
        assert_eq!(AnalysisType::Rad.y_axis_title(), "C,imp/min");
        assert_eq!(AnalysisType::Mag.y_axis_title(), "n/Tl");
        assert_eq!(AnalysisType::Geo.y_axis_title(), "E-2mg-e/l");
    }

    #[test]
    fn test_series_key_file_suffix() {
        let wat = SeriesKey::new(AnalysisType::Wat, None);
        assert_eq!(wat.file_suffix(), "WAT");
        let nh4 = SeriesKey::new(AnalysisType::Geo, Some(GeoParameter::Nh4));
        assert_eq!(nh4.file_suffix(), "NH4");
        assert_eq!(nh4.display_code(), "NH4");
        let k = SeriesKey::new(AnalysisType::Geo, Some(GeoParameter::K));
        assert_eq!(k.file_suffix(), "K__");
        assert_eq!(SeriesKey::from_file_suffix("K__"), Some(k));
        assert_eq!(SeriesKey::from_file_suffix("RAD"), Some(SeriesKey::new(AnalysisType::Rad, None)));
        assert_eq!(SeriesKey::from_file_suffix("GEO"), None);
        assert_eq!(SeriesKey::from_file_suffix("XYZ"), None);
    }
}
