//! Raw `.RAD` conversion command.

use crate::DashboardConfig;
use rssp_files::DataDir;
use std::path::Path;

pub fn run_convert(
    config: &DashboardConfig,
    input: &Path,
    station: Option<&str>,
    out_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let dir = match out_dir {
        Some(path) => DataDir::new(path),
        None => config.data_dir(),
    };
    let (out, conversion) = dir.convert_rad(input, station)?;
    println!(
        "{} -> {}: {} readings, {} lines skipped, {} readings dropped",
        input.display(),
        out.display(),
        conversion.readings.len(),
        conversion.skipped_lines,
        conversion.dropped_readings
    );
    Ok(())
}
