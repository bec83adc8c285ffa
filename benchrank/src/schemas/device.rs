use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::schemas::benchmark::{BenchmarkKind, BenchmarkRecord, BenchmarkResults};

/// How a device is treated on charts, driven by the marker column of the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeFlag {
    #[default]
    Normal,
    /// Emphasized on charts and a candidate reference device.
    Highlighted,
    /// Never plotted.
    Excluded,
}

impl IncludeFlag {
    /// `+` highlights, `-` excludes, anything else is not a marker.
    pub fn from_marker<S: AsRef<str>>(marker: S) -> Option<Self> {
        match marker.as_ref().trim() {
            "+" => Some(Self::Highlighted),
            "-" => Some(Self::Excluded),
            _ => None,
        }
    }
}

/// The attribute a table carries in parentheses after the device name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryAttribute {
    Chip,
    Capacity,
}

/// A smartphone, merged from every table it shows up in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    name: String,
    pub observed_at: Option<NaiveDate>,
    pub chip: Option<String>,
    pub capacity: Option<String>,
    pub include: IncludeFlag,
    pub results: BenchmarkResults,
}

impl Device {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            observed_at: None,
            chip: None,
            capacity: None,
            include: IncludeFlag::default(),
            results: BenchmarkResults::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, which: SecondaryAttribute) -> Option<&str> {
        match which {
            SecondaryAttribute::Chip => self.chip.as_deref(),
            SecondaryAttribute::Capacity => self.capacity.as_deref(),
        }
    }

    pub fn set_attribute(&mut self, which: SecondaryAttribute, value: String) {
        match which {
            SecondaryAttribute::Chip => self.chip = Some(value),
            SecondaryAttribute::Capacity => self.capacity = Some(value),
        }
    }

    /// Record the first date the device was seen. Later dates are ignored.
    /// Returns whether the date was taken.
    pub fn observe(&mut self, date: NaiveDate) -> bool {
        if self.observed_at.is_some() {
            return false;
        }
        self.observed_at = Some(date);
        true
    }

    pub fn is_highlighted(&self) -> bool {
        self.include == IncludeFlag::Highlighted
    }

    pub fn is_excluded(&self) -> bool {
        self.include == IncludeFlag::Excluded
    }

    pub fn record(&self, kind: BenchmarkKind) -> &BenchmarkRecord {
        self.results.get(kind)
    }

    pub fn report(&self, kind: BenchmarkKind) -> DeviceReport<'_> {
        DeviceReport { device: self, kind }
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Smartphone {} on {} with {} tested on {}",
            self.name,
            self.chip.as_deref().unwrap_or("unknown chip"),
            self.capacity.as_deref().unwrap_or("unknown battery"),
            self.observed_at
                .map(|date| date.to_string())
                .unwrap_or_else(|| "an unknown date".to_string())
        )
    }
}

/// Plain-text summary of how one device did in one benchmark.
pub struct DeviceReport<'a> {
    device: &'a Device,
    kind: BenchmarkKind,
}

impl Display for DeviceReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let record = self.device.record(self.kind);
        writeln!(
            f,
            "Smartphone {}, results in {}:",
            self.device.name,
            self.kind.display_name()
        )?;
        match self.device.observed_at {
            Some(date) => writeln!(f, "Date: {}", date)?,
            None => writeln!(f, "Date: unknown")?,
        }
        for (field, score) in record.sub_scores() {
            writeln!(f, "{}: {}", field.label(), score)?;
        }
        if record.sub_scores().len() > 1 {
            writeln!(f, "Total score: {}", record.total_score())?;
        }
        if let Some(diff) = record.percentage_diff {
            writeln!(f, "Relative to reference: {}%", diff)?;
        }
        Ok(())
    }
}
