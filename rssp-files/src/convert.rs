//! Writing converted raw radon dumps as Loader-compatible CSV.

use crate::DataDir;
use anyhow::{bail, Context};
use rssp_core::analysis::{AnalysisType, SeriesKey};
use rssp_core::raw_rad::{parse_rad, RadConversion};
use rssp_utils::dates::format_date;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write readings as `date,hour,value` rows; a missing reading is an empty
/// value cell.
pub fn write_rad_csv<W: Write>(writer: W, conversion: &RadConversion) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["date", "hour", "value"])?;
    for reading in &conversion.readings {
        let value = reading.value.map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([
            format_date(&reading.timestamp.date()),
            reading.hour_label(),
            value,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

impl DataDir {
    /// Convert a raw `.RAD` file into `{STATION}{YY}_RAD.csv` inside this
    /// directory. `station` overrides the code taken from the file name.
    pub fn convert_rad(&self, raw: &Path, station: Option<&str>) -> anyhow::Result<(PathBuf, RadConversion)> {
        let name = raw
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("{} has no usable file name", raw.display()))?;
        let contents =
            fs::read_to_string(raw).with_context(|| format!("failed to read {}", raw.display()))?;
        let conversion = parse_rad(name, &contents)?;

        let station = match station.map(str::to_string).or_else(|| conversion.station.clone()) {
            Some(code) => code,
            None => bail!("cannot tell the station of {}; pass it explicitly", name),
        };
        let key = SeriesKey::new(AnalysisType::Rad, None);
        let year_tag = (conversion.year % 100) as u32;
        let out = self.checked_path_for(&station, year_tag, key)?;

        let file =
            fs::File::create(&out).with_context(|| format!("failed to create {}", out.display()))?;
        write_rad_csv(file, &conversion)?;
        log::info!(
            "convert: wrote {} readings from {} to {}",
            conversion.readings.len(),
            name,
            out.display()
        );
        Ok((out, conversion))
    }
}
