//! Command implementations for the rssp CLI.
//!
//! Each subcommand runs one synchronous pass over the data directory named
//! in the [`DashboardConfig`] and prints its result.

use clap::Subcommand;
use rssp_core::analysis::{AnalysisType, GeoParameter};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub mod analyze;
pub mod config;
pub mod convert;
pub mod render;
pub mod report;

pub use config::DashboardConfig;

#[derive(Subcommand)]
pub enum Command {
    /// Build the chart payload for one station and print it as JSON
    Render {
        /// Analysis type: WAT, RAD, MAG or GEO
        #[arg(short, long, default_value = "WAT")]
        analysis: AnalysisType,

        /// Station code; defaults to the analysis type's default station
        #[arg(short, long)]
        station: Option<String>,

        /// Geochemical parameter (GEO only); defaults to the station's first
        #[arg(short, long)]
        parameter: Option<GeoParameter>,

        /// Keep every Nth row: 1, 2, 3 or 5
        #[arg(long, default_value_t = 1)]
        stride: u32,

        /// Number of view-mode toggle presses; odd values select yearly mode
        #[arg(short, long, default_value_t = 0)]
        toggles: u64,

        /// Write the payload here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Latest reading of every data file for a two-digit year tag
    Latest {
        #[arg(short, long)]
        year: u32,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Correlation between two stations' readings for one year
    Correlate {
        #[arg(short, long)]
        analysis: AnalysisType,

        #[arg(short, long)]
        year: u32,

        /// Geochemical parameter (GEO only)
        #[arg(short, long)]
        parameter: Option<GeoParameter>,

        /// Analysis type of the second station, if it differs
        #[arg(long)]
        with_analysis: Option<AnalysisType>,

        /// Geochemical parameter of the second station, if it differs
        #[arg(long)]
        with_parameter: Option<GeoParameter>,

        first: String,

        second: String,
    },

    /// Pairwise correlation of every station of an analysis type for one year
    CorrelationMatrix {
        #[arg(short, long)]
        analysis: AnalysisType,

        #[arg(short, long)]
        year: u32,

        /// Geochemical parameter (GEO only)
        #[arg(short, long)]
        parameter: Option<GeoParameter>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },

    /// Convert a raw radon logger dump (.RAD) into a station CSV
    ConvertRad {
        /// Raw file, e.g. ARTK21.RAD
        input: PathBuf,

        /// Station code, when the file name does not start with one
        #[arg(short, long)]
        station: Option<String>,

        /// Directory to write into; defaults to the data directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// List the stations of an analysis type, or of all types
    Stations {
        #[arg(short, long)]
        analysis: Option<AnalysisType>,
    },
}

pub fn run(command: Command, config: &DashboardConfig) -> anyhow::Result<()> {
    match command {
        Command::Render {
            analysis,
            station,
            parameter,
            stride,
            toggles,
            output,
            pretty,
        } => {
            let request = render::RenderRequest {
                analysis,
                station,
                parameter,
                stride,
                toggles,
            };
            render::run_render(config, &request, output.as_deref(), pretty)
        }
        Command::Latest { year, json } => report::run_latest(config, year, json),
        Command::Correlate {
            analysis,
            year,
            parameter,
            with_analysis,
            with_parameter,
            first,
            second,
        } => analyze::run_correlate(
            config,
            &analyze::CorrelateRequest {
                analysis,
                parameter,
                with_analysis,
                with_parameter,
                year,
                first: &first,
                second: &second,
            },
        ),
        Command::CorrelationMatrix {
            analysis,
            year,
            parameter,
            output,
            pretty,
        } => analyze::run_matrix(config, analysis, parameter, year, output.as_deref(), pretty),
        Command::ConvertRad {
            input,
            station,
            out_dir,
        } => convert::run_convert(config, &input, station.as_deref(), out_dir.as_deref()),
        Command::Stations { analysis } => report::run_stations(analysis),
    }
}

/// Serialize `value` to `output`, or to stdout when no path is given.
pub(crate) fn write_json<T: Serialize>(
    value: &T,
    output: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match output {
        Some(path) => {
            fs::write(path, json)?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}
