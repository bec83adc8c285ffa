use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    common::{parse_score, split_label},
    error::{Error, Result},
    modules::{registry::Registry, sheets::Row},
    schemas::{
        benchmark::{BenchmarkKind, BenchmarkRecord, SubScore},
        device::{IncludeFlag, SecondaryAttribute},
    },
};

fn default_header_rows() -> usize {
    2
}

/// How to read one benchmark table.
///
/// The column layout is fixed (marker, date, label, then one column per
/// sub-score of the benchmark), so a profile only says which sheet to read,
/// how many header rows sit above the data, and what the label's parentheses hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingProfile {
    pub benchmark: BenchmarkKind,
    pub sheet: String,
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,
    pub attribute: SecondaryAttribute,
}

impl ReadingProfile {
    /// The profile of the published workbook for a benchmark.
    pub fn new(benchmark: BenchmarkKind) -> Self {
        let sheet = match benchmark {
            BenchmarkKind::GeekBench4 => "GeekBench 4",
            BenchmarkKind::SlingShotExtreme => "3DMark Sling Shot Extreme",
            BenchmarkKind::Antutu7 => "Antutu Benchmark 7",
            BenchmarkKind::BatteryTest => "battery_test",
        };
        Self {
            benchmark,
            sheet: sheet.to_string(),
            header_rows: default_header_rows(),
            attribute: benchmark.secondary_attribute(),
        }
    }

    /// Sub-score names in table-column order.
    pub fn fields(&self) -> &'static [SubScore] {
        self.benchmark.fields()
    }
}

/// What a single table pass did to the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub rows: usize,
    pub added: usize,
    pub updated: usize,
}

/// One table row, fully parsed but not yet merged.
struct ParsedRow {
    name: String,
    attribute: String,
    date: Option<NaiveDate>,
    flag: Option<IncludeFlag>,
    record: BenchmarkRecord,
}

/// Merge the rows of one benchmark table into the registry.
///
/// Rows are read in order until the first row without a label. Header rows must
/// already be skipped. Each row creates or updates its device, overwrites the
/// secondary attribute, fills in the date if the device has none yet, applies
/// the marker, and replaces the device's record for this benchmark, so reading
/// the same table twice leaves the registry as reading it once.
///
/// # Errors
/// [`Error::MalformedLabel`], [`Error::InvalidDate`] or [`Error::InvalidScore`]
/// for the first broken row. Every row is parsed before any is merged, so on
/// error the registry is left untouched.
pub fn ingest_table<I>(
    registry: &mut Registry,
    profile: &ReadingProfile,
    date_format: &str,
    rows: I,
) -> Result<IngestSummary>
where
    I: IntoIterator<Item = Row>,
{
    let kind = profile.benchmark;

    let mut parsed = Vec::new();
    for row in rows {
        let label = match row.label() {
            Some(label) => label,
            None => break,
        };
        let (name, attribute) = split_label(label)?;
        let date = parse_date(&row, &name, date_format)?;
        let record = parse_record(&row, kind, &name)?;
        let flag = row.marker().and_then(IncludeFlag::from_marker);
        parsed.push(ParsedRow {
            name,
            attribute,
            date,
            flag,
            record,
        });
    }

    let mut summary = IngestSummary::default();
    for row in parsed {
        let (device, created) = registry.upsert(&row.name);
        if created {
            summary.added += 1;
            info!(device = %row.name, sheet = %profile.sheet, "added device");
        } else {
            summary.updated += 1;
            debug!(device = %row.name, sheet = %profile.sheet, "updated device");
        }

        device.set_attribute(profile.attribute, row.attribute);
        if let Some(date) = row.date {
            device.observe(date);
        }
        if let Some(flag) = row.flag {
            device.include = flag;
        }
        device.results.replace(row.record);

        summary.rows += 1;
    }

    info!(
        sheet = %profile.sheet,
        benchmark = %kind,
        rows = summary.rows,
        added = summary.added,
        updated = summary.updated,
        "ingested table"
    );
    Ok(summary)
}

fn parse_date(row: &Row, device: &str, format: &str) -> Result<Option<NaiveDate>> {
    row.date()
        .map(|cell| {
            NaiveDate::parse_from_str(cell, format).map_err(|_| Error::InvalidDate {
                device: device.to_string(),
                cell: cell.to_string(),
                format: format.to_string(),
            })
        })
        .transpose()
}

fn parse_record(row: &Row, kind: BenchmarkKind, device: &str) -> Result<BenchmarkRecord> {
    let sub_scores = kind
        .fields()
        .iter()
        .enumerate()
        .map(|(n, &field)| {
            let cell = row.score(n);
            cell.and_then(parse_score)
                .map(|score| (field, score))
                .ok_or_else(|| Error::InvalidScore {
                    benchmark: kind,
                    device: device.to_string(),
                    field,
                    cell: cell.map(str::to_string),
                })
        })
        .collect::<Result<Vec<_>>>()?;
    BenchmarkRecord::from_sub_scores(kind, sub_scores).map_err(|field| {
        let column = kind.fields().iter().position(|&f| f == field);
        Error::InvalidScore {
            benchmark: kind,
            device: device.to_string(),
            field,
            cell: column.and_then(|n| row.score(n)).map(str::to_string),
        }
    })
}
