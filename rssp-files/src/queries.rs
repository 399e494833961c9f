//! Directory-wide queries: listing data files and reading the latest row of
//! each one.

use crate::models::{DataFile, LatestGroup, LatestReading};
use crate::{DataDir, DataFileName};
use anyhow::Context;
use rssp_core::analysis::AnalysisType;
use rssp_utils::dates::format_date;
use std::fs;

impl DataDir {
    /// Every recognised data file in the directory, sorted by station, year
    /// tag and series. Other files are ignored.
    pub fn list_files(&self) -> anyhow::Result<Vec<DataFile>> {
        let entries = fs::read_dir(self.root())
            .with_context(|| format!("failed to list {}", self.root().display()))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(parsed) = name.to_str().and_then(DataFileName::parse) else {
                continue;
            };
            files.push(DataFile {
                station: parsed.station,
                year_tag: parsed.year_tag,
                key: parsed.key,
                path: entry.path(),
            });
        }
        files.sort_by(|a, b| {
            (&a.station, a.year_tag, a.key.file_suffix())
                .cmp(&(&b.station, b.year_tag, b.key.file_suffix()))
        });
        log::info!("query: list_files found {} data files", files.len());
        Ok(files)
    }

    /// Files of one analysis type for one year tag.
    pub fn files_for(&self, analysis: AnalysisType, year_tag: u32) -> anyhow::Result<Vec<DataFile>> {
        Ok(self
            .list_files()?
            .into_iter()
            .filter(|f| f.key.analysis == analysis && f.year_tag == year_tag % 100)
            .collect())
    }

    /// The most recent row of every file carrying `year_tag`, grouped by
    /// analysis type in WAT, RAD, MAG, GEO order. Groups with no files are
    /// omitted; files that cannot be parsed or hold no rows are skipped.
    pub fn latest_readings(&self, year_tag: u32) -> anyhow::Result<Vec<LatestGroup>> {
        let files = self.list_files()?;
        let mut groups = Vec::new();
        for analysis in AnalysisType::ALL {
            let mut readings = Vec::new();
            for file in files
                .iter()
                .filter(|f| f.key.analysis == analysis && f.year_tag == year_tag % 100)
            {
                let observations = match self.load_file(&file.path, &file.station, file.key) {
                    Ok(Some((observations, _))) => observations,
                    Ok(None) => continue,
                    Err(e) => {
                        log::warn!("query: skipping {}: {:#}", file.path.display(), e);
                        continue;
                    }
                };
                let Some(latest) = observations.iter().max_by_key(|o| o.timestamp) else {
                    continue;
                };
                readings.push(LatestReading {
                    station: file.station.clone(),
                    series: file.key.display_code().to_string(),
                    file: file.file_name(),
                    date: format_date(&latest.date),
                    hour: latest.hour.clone(),
                    value: latest.value,
                });
            }
            if !readings.is_empty() {
                groups.push(LatestGroup { analysis, readings });
            }
        }
        log::info!(
            "query: latest_readings for {:02} returned {} groups",
            year_tag % 100,
            groups.len()
        );
        Ok(groups)
    }
}

impl DataFile {
    pub fn file_name(&self) -> String {
        crate::file_name(&self.station, self.year_tag, self.key)
    }
}
