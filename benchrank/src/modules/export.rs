use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

use crate::{modules::registry::Registry, schemas::benchmark::BenchmarkKind};

/// One cell of an exported table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Date(NaiveDate),
    Text(String),
    Score(i64),
}

impl From<Option<String>> for Cell {
    fn from(text: Option<String>) -> Self {
        text.map(Cell::Text).unwrap_or(Cell::Empty)
    }
}

/// The whole registry flattened to one row per device, for checking what was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryTable {
    pub heading: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RegistryTable {
    pub fn write_json<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(writer, self).context("could not write registry table")
    }
}

/// Flatten the registry: date, name, chip and battery, then every sub-score of
/// every benchmark (and its total, for benchmarks with several sub-scores).
pub fn export(registry: &Registry) -> RegistryTable {
    let mut heading: Vec<String> = ["Date", "Smartphone", "Chip", "Battery"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for kind in BenchmarkKind::ALL {
        for field in kind.fields() {
            heading.push(format!("{}: {}", kind.display_name(), field.label()));
        }
        if kind.fields().len() > 1 {
            heading.push(format!("{}: Total score", kind.display_name()));
        }
    }

    let rows = registry
        .iter()
        .map(|device| {
            let mut row = vec![
                device.observed_at.map(Cell::Date).unwrap_or(Cell::Empty),
                Cell::Text(device.name().to_string()),
                device.chip.clone().into(),
                device.capacity.clone().into(),
            ];
            for kind in BenchmarkKind::ALL {
                let record = device.record(kind);
                row.extend(record.sub_scores().iter().map(|&(_, score)| Cell::Score(score)));
                if record.sub_scores().len() > 1 {
                    row.push(Cell::Score(record.total_score()));
                }
            }
            row
        })
        .collect();

    RegistryTable { heading, rows }
}
