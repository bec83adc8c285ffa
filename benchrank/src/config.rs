use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, path::Path};

use crate::{
    error::{Error, Result},
    modules::{
        ingest::ReadingProfile,
        series::{Emphasis, Palette},
    },
    schemas::benchmark::BenchmarkKind,
};

/// Settings for one run. Every field falls back to the published workbook's layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tables in the order they are read. Later tables overwrite the chip or
    /// battery capacity set by earlier ones.
    pub tables: Vec<ReadingProfile>,
    /// `chrono` format of the date column.
    pub date_format: String,
    pub emphasis: Emphasis,
    pub palette: Palette,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tables: BenchmarkKind::ALL.iter().copied().map(ReadingProfile::new).collect(),
            date_format: "%d.%m.%Y".to_string(),
            emphasis: Emphasis::default(),
            palette: Palette::default(),
        }
    }
}

impl Settings {
    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        serde_json::from_reader(reader).context("could not parse settings")
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("could not open settings file {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("in settings file {}", path.display()))
    }

    /// The reading profile registered for a benchmark.
    ///
    /// # Errors
    /// [`Error::UnknownBenchmarkType`] if no table is configured for it.
    pub fn profile(&self, kind: BenchmarkKind) -> Result<&ReadingProfile> {
        self.tables
            .iter()
            .find(|profile| profile.benchmark == kind)
            .ok_or_else(|| Error::UnknownBenchmarkType {
                name: kind.to_string(),
            })
    }
}
