use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::{fmt::Display, str::FromStr};

use crate::error::Error;
use crate::schemas::device::SecondaryAttribute;

/// A benchmark we collect results for. Each one has its own sub-score shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr)]
pub enum BenchmarkKind {
    GeekBench4,
    SlingShotExtreme,
    Antutu7,
    BatteryTest,
}

impl BenchmarkKind {
    /// Every known benchmark, in the order the tables are read by default.
    pub const ALL: [BenchmarkKind; 4] = [
        Self::GeekBench4,
        Self::SlingShotExtreme,
        Self::Antutu7,
        Self::BatteryTest,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::GeekBench4 => 0,
            Self::SlingShotExtreme => 1,
            Self::Antutu7 => 2,
            Self::BatteryTest => 3,
        }
    }

    /// Stable machine name, e.g. `geek_bench4`.
    pub fn key(self) -> &'static str {
        match self {
            Self::GeekBench4 => "geek_bench4",
            Self::SlingShotExtreme => "sling_shot_extreme",
            Self::Antutu7 => "antutu7",
            Self::BatteryTest => "battery_test",
        }
    }

    /// Human-readable name, e.g. `GeekBench 4`.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::GeekBench4 => "GeekBench 4",
            Self::SlingShotExtreme => "3DMark Sling Shot Extreme",
            Self::Antutu7 => "AnTuTu Benchmark 7",
            Self::BatteryTest => "Battery Test",
        }
    }

    /// Sub-scores in the order their columns appear in the source table.
    pub fn fields(self) -> &'static [SubScore] {
        match self {
            Self::GeekBench4 => &[SubScore::MultiCore, SubScore::SingleCore],
            Self::SlingShotExtreme | Self::Antutu7 => &[SubScore::Score],
            Self::BatteryTest => &[SubScore::Movie, SubScore::Read, SubScore::Game],
        }
    }

    /// Sub-scores in the order they are stacked on the chart.
    pub fn chart_fields(self) -> &'static [SubScore] {
        match self {
            Self::BatteryTest => &[SubScore::Read, SubScore::Movie, SubScore::Game],
            _ => self.fields(),
        }
    }

    /// Which attribute the labels of this benchmark's table carry in parentheses.
    pub fn secondary_attribute(self) -> SecondaryAttribute {
        match self {
            Self::BatteryTest => SecondaryAttribute::Capacity,
            _ => SecondaryAttribute::Chip,
        }
    }

    pub fn chart_title(self) -> &'static str {
        match self {
            Self::GeekBench4 => "Processor performance (GeekBench 4), points",
            Self::SlingShotExtreme => "Gaming performance (3DMark Sling Shot Extreme), points",
            Self::Antutu7 => "Whole-system performance (AnTuTu Benchmark 7), points",
            Self::BatteryTest => "Battery life, minutes",
        }
    }
}

impl FromStr for BenchmarkKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.key() == s.trim())
            .ok_or_else(|| Error::UnknownBenchmarkType {
                name: s.to_string(),
            })
    }
}

impl Display for BenchmarkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One named component of a benchmark result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubScore {
    MultiCore,
    SingleCore,
    Score,
    Read,
    Movie,
    Game,
}

impl SubScore {
    /// Column heading used in exports and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::MultiCore => "Multi-Core Score",
            Self::SingleCore => "Single-Core Score",
            Self::Score => "Score",
            Self::Read => "Read score",
            Self::Movie => "Movie score",
            Self::Game => "Game score",
        }
    }

    /// Legend entry for the chart trace drawn from this sub-score.
    pub fn trace_name(self) -> &'static str {
        match self {
            Self::MultiCore => "All cores",
            Self::SingleCore => "Single core",
            Self::Score => "points",
            Self::Read => "Reading",
            Self::Movie => "Video",
            Self::Game => "Games",
        }
    }
}

impl Display for SubScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::MultiCore => "multi_core",
            Self::SingleCore => "single_core",
            Self::Score => "score",
            Self::Read => "read",
            Self::Movie => "movie",
            Self::Game => "game",
        })
    }
}

/// A device's score relative to the reference device of a ranking pass.
///
/// Written the way it appears on the chart: `100` for the reference (or anything
/// within one percent above it), `-25` for 25% behind, `+10` for 10% ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub enum PercentageDiff {
    Par,
    Below(i64),
    Above(i64),
}

impl PercentageDiff {
    /// Compare `score` against `reference`. The caller guarantees `reference > 0`.
    pub fn between(score: i64, reference: i64) -> Self {
        /* integer division, same truncation as the published charts */
        let difference = i128::from(score) * 100 / i128::from(reference);
        if difference == 100 {
            Self::Par
        } else if score < reference {
            Self::Below(saturate(100 - difference))
        } else {
            Self::Above(saturate(difference - 100))
        }
    }

    pub fn is_par(&self) -> bool {
        matches!(self, Self::Par)
    }
}

fn saturate(n: i128) -> i64 {
    i64::try_from(n).unwrap_or(if n < 0 { i64::MIN } else { i64::MAX })
}

impl FromStr for PercentageDiff {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "100" {
            return Ok(Self::Par);
        }
        if let Some(n) = s.strip_prefix('-') {
            Ok(Self::Below(n.parse()?))
        } else if let Some(n) = s.strip_prefix('+') {
            Ok(Self::Above(n.parse()?))
        } else {
            anyhow::bail!("not a percentage difference: {:?}", s)
        }
    }
}

impl Display for PercentageDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Par => write!(f, "100"),
            Self::Below(n) => write!(f, "-{}", n),
            Self::Above(n) => write!(f, "+{}", n),
        }
    }
}

/// One device's result in one benchmark.
///
/// The total is always the sum of the sub-scores; there is no way to set it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkRecord {
    kind: BenchmarkKind,
    sub_scores: Vec<(SubScore, i64)>,
    total_score: i64,
    pub percentage_diff: Option<PercentageDiff>,
}

impl BenchmarkRecord {
    /// A record with every sub-score at zero, as held by a device before its row is read.
    pub fn empty(kind: BenchmarkKind) -> Self {
        Self {
            kind,
            sub_scores: kind.fields().iter().map(|&field| (field, 0)).collect(),
            total_score: 0,
            percentage_diff: None,
        }
    }

    /// Build a record from scores given in table-column order.
    /// Returns `None` if the number of scores does not match the benchmark,
    /// or if their sum does not fit in an `i64`.
    pub fn new(kind: BenchmarkKind, scores: &[i64]) -> Option<Self> {
        if scores.len() != kind.fields().len() {
            return None;
        }
        Self::from_sub_scores(
            kind,
            kind.fields().iter().copied().zip(scores.iter().copied()).collect(),
        )
        .ok()
    }

    /// On overflow, returns the sub-score whose addition pushed the total out of range.
    pub(crate) fn from_sub_scores(
        kind: BenchmarkKind,
        sub_scores: Vec<(SubScore, i64)>,
    ) -> Result<Self, SubScore> {
        let total_score = sub_scores
            .iter()
            .try_fold(0i64, |total, &(field, score)| total.checked_add(score).ok_or(field))?;
        Ok(Self {
            kind,
            sub_scores,
            total_score,
            percentage_diff: None,
        })
    }

    pub fn kind(&self) -> BenchmarkKind {
        self.kind
    }

    pub fn sub_scores(&self) -> &[(SubScore, i64)] {
        &self.sub_scores
    }

    /// The value of one sub-score, or zero if this benchmark has no such sub-score.
    pub fn score(&self, field: SubScore) -> i64 {
        self.sub_scores
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, score)| *score)
            .unwrap_or_default()
    }

    pub fn total_score(&self) -> i64 {
        self.total_score
    }
}

/// Exactly one [`BenchmarkRecord`] per [`BenchmarkKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkResults([BenchmarkRecord; 4]);

impl BenchmarkResults {
    pub fn new() -> Self {
        Self(BenchmarkKind::ALL.map(BenchmarkRecord::empty))
    }

    pub fn get(&self, kind: BenchmarkKind) -> &BenchmarkRecord {
        &self.0[kind.index()]
    }

    pub fn get_mut(&mut self, kind: BenchmarkKind) -> &mut BenchmarkRecord {
        &mut self.0[kind.index()]
    }

    /// Swap in a freshly read record, returning the previous one.
    pub fn replace(&mut self, record: BenchmarkRecord) -> BenchmarkRecord {
        std::mem::replace(&mut self.0[record.kind.index()], record)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BenchmarkRecord> {
        self.0.iter()
    }
}

impl Default for BenchmarkResults {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{BenchmarkKind, BenchmarkRecord, BenchmarkResults, PercentageDiff, SubScore};
    use crate::error::Error;

    #[test]
    fn test_kind_names() {
        for kind in BenchmarkKind::ALL {
            assert_eq!(kind.key().parse::<BenchmarkKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.key());
        }
        match "geekbench5".parse::<BenchmarkKind>() {
            Err(Error::UnknownBenchmarkType { name }) => assert_eq!(name, "geekbench5"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_axes_per_kind() {
        assert_eq!(BenchmarkKind::GeekBench4.chart_fields().len(), 2);
        assert_eq!(BenchmarkKind::SlingShotExtreme.chart_fields().len(), 1);
        assert_eq!(BenchmarkKind::Antutu7.chart_fields().len(), 1);
        assert_eq!(BenchmarkKind::BatteryTest.chart_fields().len(), 3);
        for kind in BenchmarkKind::ALL {
            let mut fields = kind.fields().to_vec();
            let mut chart = kind.chart_fields().to_vec();
            fields.sort_by_key(|f| f.to_string());
            chart.sort_by_key(|f| f.to_string());
            assert_eq!(fields, chart);
        }
    }

    #[test]
    fn test_total_is_sum() {
        let record = BenchmarkRecord::new(BenchmarkKind::BatteryTest, &[600, 720, 300]).unwrap();
        assert_eq!(record.total_score(), 1620);
        assert_eq!(record.score(SubScore::Movie), 600);
        assert_eq!(record.score(SubScore::Read), 720);
        assert_eq!(record.score(SubScore::Game), 300);
        assert_eq!(record.score(SubScore::MultiCore), 0);
        assert_eq!(
            record.total_score(),
            record.sub_scores().iter().map(|(_, s)| s).sum::<i64>()
        );

        let record = BenchmarkRecord::new(BenchmarkKind::Antutu7, &[289000]).unwrap();
        assert_eq!(record.total_score(), 289000);

        assert!(BenchmarkRecord::new(BenchmarkKind::GeekBench4, &[1]).is_none());
        assert_eq!(BenchmarkRecord::empty(BenchmarkKind::GeekBench4).total_score(), 0);
    }

    #[test]
    fn test_percentage_diff() {
        assert_eq!(PercentageDiff::between(200, 200), PercentageDiff::Par);
        assert_eq!(PercentageDiff::between(150, 200), PercentageDiff::Below(25));
        assert_eq!(PercentageDiff::between(220, 200), PercentageDiff::Above(10));
        /* within one percent above the reference truncates to par */
        assert_eq!(PercentageDiff::between(201, 200), PercentageDiff::Par);
        /* just below the reference still reads as one percent behind */
        assert_eq!(PercentageDiff::between(199, 200), PercentageDiff::Below(1));

        assert_eq!(PercentageDiff::Par.to_string(), "100");
        assert_eq!(PercentageDiff::Below(25).to_string(), "-25");
        assert_eq!(PercentageDiff::Above(10).to_string(), "+10");

        assert_eq!("-25".parse::<PercentageDiff>().unwrap(), PercentageDiff::Below(25));
        assert_eq!("+10".parse::<PercentageDiff>().unwrap(), PercentageDiff::Above(10));
        assert_eq!("100".parse::<PercentageDiff>().unwrap(), PercentageDiff::Par);
        assert!("25".parse::<PercentageDiff>().is_err());
        assert!("".parse::<PercentageDiff>().is_err());
    }

    #[test]
    fn test_percentage_diff_large_scores() {
        /* above i64::MAX / 100 */
        assert_eq!(
            PercentageDiff::between(100_000_000_000_000_000, 1_000_000_000_000_000),
            PercentageDiff::Above(9900)
        );
        assert_eq!(
            PercentageDiff::between(150, 200_000_000_000_000_000),
            PercentageDiff::Below(100)
        );
        assert_eq!(PercentageDiff::between(i64::MAX, i64::MAX), PercentageDiff::Par);
        assert_eq!(PercentageDiff::between(i64::MAX, 1), PercentageDiff::Above(i64::MAX));
    }

    #[test]
    fn test_total_out_of_range() {
        assert_eq!(BenchmarkRecord::new(BenchmarkKind::GeekBench4, &[i64::MAX, 1]), None);
        assert_eq!(
            BenchmarkRecord::from_sub_scores(
                BenchmarkKind::GeekBench4,
                vec![(SubScore::MultiCore, i64::MAX), (SubScore::SingleCore, 1)],
            ),
            Err(SubScore::SingleCore)
        );
        let record = BenchmarkRecord::new(BenchmarkKind::GeekBench4, &[i64::MAX, 0]).unwrap();
        assert_eq!(record.total_score(), i64::MAX);
    }

    #[test]
    fn test_replace_record() {
        let mut results = BenchmarkResults::new();
        let fresh = BenchmarkRecord::new(BenchmarkKind::GeekBench4, &[9000, 2400]).unwrap();
        let old = results.replace(fresh.clone());
        assert_eq!(old, BenchmarkRecord::empty(BenchmarkKind::GeekBench4));
        assert_eq!(results.get(BenchmarkKind::GeekBench4), &fresh);
        assert_eq!(results.get(BenchmarkKind::Antutu7).total_score(), 0);
        assert_eq!(results.iter().count(), 4);
    }
}
