use anyhow::Context;
use tracing::{info, warn};

use crate::{
    config::Settings,
    error::Result,
    modules::{
        export::{export, RegistryTable},
        ingest::{ingest_table, IngestSummary, ReadingProfile},
        ranking::rank,
        registry::Registry,
        series::{bar_colors, format_series, ChartSeries},
        sheets::{Row, SheetSource},
    },
    schemas::benchmark::BenchmarkKind,
};

/// Reads every benchmark table into one registry and prepares chart series from it.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    settings: Settings,
    registry: Registry,
}

impl Aggregator {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            registry: Registry::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Read every configured table from `source`, in the configured order.
    ///
    /// # Errors
    /// Errors if a sheet cannot be fetched or one of its rows is broken.
    /// The registry is then left as it was before the call.
    pub fn load<S: SheetSource + ?Sized>(&mut self, source: &mut S) -> anyhow::Result<()> {
        let mut staged = self.registry.clone();
        for profile in &self.settings.tables {
            let rows = source
                .sheet(&profile.sheet)
                .with_context(|| format!("could not fetch sheet {:?}", profile.sheet))?;
            ingest_table(
                &mut staged,
                profile,
                &self.settings.date_format,
                rows.into_iter().skip(profile.header_rows),
            )
            .with_context(|| format!("could not read sheet {:?}", profile.sheet))?;
        }
        self.registry = staged;
        info!(devices = self.registry.len(), "loaded workbook");
        Ok(())
    }

    /// Merge one table whose header rows are already stripped.
    pub fn ingest<I>(&mut self, profile: &ReadingProfile, rows: I) -> Result<IngestSummary>
    where
        I: IntoIterator<Item = Row>,
    {
        ingest_table(&mut self.registry, profile, &self.settings.date_format, rows)
    }

    /// Rank one benchmark and format it for the chart.
    ///
    /// # Errors
    /// [`crate::Error::UnknownBenchmarkType`] if no table is configured for `kind`,
    /// otherwise whatever the ranking pass fails with.
    pub fn prepare(&mut self, kind: BenchmarkKind) -> Result<ChartSeries> {
        let profile = self.settings.profile(kind)?;
        let ranking = rank(&mut self.registry, kind)?;
        Ok(format_series(
            &self.registry,
            &ranking,
            profile.attribute,
            &self.settings.emphasis,
        ))
    }

    /// Like [`Aggregator::prepare`], with the benchmark given by name, e.g. `"geek_bench4"`.
    pub fn prepare_named(&mut self, name: &str) -> Result<ChartSeries> {
        self.prepare(name.parse()?)
    }

    /// Prepare every configured benchmark. A failing benchmark does not stop the others.
    pub fn prepare_all(&mut self) -> Vec<(BenchmarkKind, Result<ChartSeries>)> {
        let kinds: Vec<BenchmarkKind> = self.settings.tables.iter().map(|t| t.benchmark).collect();
        kinds
            .into_iter()
            .map(|kind| {
                let series = self.prepare(kind);
                if let Err(e) = &series {
                    warn!(benchmark = %kind, error = %e, "could not prepare series");
                }
                (kind, series)
            })
            .collect()
    }

    /// Bar colors for a prepared series, using the configured palette.
    pub fn colors(&self, series: &ChartSeries) -> Vec<Vec<String>> {
        bar_colors(series, &self.settings.palette)
    }

    pub fn export(&self) -> RegistryTable {
        export(&self.registry)
    }
}
