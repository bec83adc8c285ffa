use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{
    modules::{ranking::Ranking, registry::Registry},
    schemas::{benchmark::BenchmarkKind, device::SecondaryAttribute},
};

/// Everything a bar chart of one benchmark needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub benchmark: BenchmarkKind,
    pub title: String,
    /// One legend entry per axis.
    pub trace_names: Vec<String>,
    /// One label per bar, lowest score first.
    pub labels: Vec<String>,
    /// One array per chart sub-score, each aligned with `labels`.
    pub axes: Vec<Vec<i64>>,
    pub highlighted: BTreeSet<usize>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether the chart stacks three non-empty axes, which shifts the palette.
    pub fn uses_all_axes(&self) -> bool {
        self.axes.len() == 3 && self.axes.iter().all(|axis| !axis.is_empty())
    }
}

/// Markers wrapped around the label of a highlighted bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emphasis {
    pub open: String,
    pub close: String,
}

impl Emphasis {
    pub fn wrap(&self, text: &str) -> String {
        format!("{}{}{}", self.open, text, self.close)
    }
}

impl Default for Emphasis {
    fn default() -> Self {
        Self {
            open: "<b>".to_string(),
            close: "</b>".to_string(),
        }
    }
}

/// Bar colors, one per axis, for ordinary and highlighted bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub default_colors: Vec<String>,
    pub highlight_colors: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            default_colors: vec![
                "rgba(255, 133, 0, 1)".to_string(),
                "rgba(255, 160, 57, 1)".to_string(),
                "rgba(211, 110, 0, 1)".to_string(),
            ],
            highlight_colors: vec![
                "rgba(0, 112, 192, 1)".to_string(),
                "rgba(57, 147, 211, 1)".to_string(),
                "rgba(0, 76, 153, 1)".to_string(),
            ],
        }
    }
}

/// Turn a ranking into labels and axis arrays.
///
/// Labels read `"<rank>. <name> (<attribute>)"` with rank counting down to 1 at the
/// best device, followed by `" (<diff>%)"` unless the device is on par with the
/// reference. Highlighted labels are wrapped in `emphasis`.
pub fn format_series(
    registry: &Registry,
    ranking: &Ranking,
    attribute: SecondaryAttribute,
    emphasis: &Emphasis,
) -> ChartSeries {
    let kind = ranking.benchmark;
    let devices = registry.devices();
    let count = ranking.order.len();
    let fields = kind.chart_fields();

    let mut labels = Vec::with_capacity(count);
    let mut axes = vec![Vec::with_capacity(count); fields.len()];

    for (position, &i) in ranking.order.iter().enumerate() {
        let device = &devices[i];
        let record = device.record(kind);

        let mut label = format!(
            "{}. {} ({})",
            count - position,
            device.name(),
            device.attribute(attribute).unwrap_or_default()
        );
        if let Some(diff) = record.percentage_diff.filter(|diff| !diff.is_par()) {
            label.push_str(&format!(" ({}%)", diff));
        }
        if ranking.highlighted.contains(&position) {
            label = emphasis.wrap(&label);
        }
        labels.push(label);

        for (axis, &field) in axes.iter_mut().zip(fields) {
            axis.push(record.score(field));
        }
    }

    ChartSeries {
        benchmark: kind,
        title: kind.chart_title().to_string(),
        trace_names: fields.iter().map(|f| f.trace_name().to_string()).collect(),
        labels,
        axes,
        highlighted: ranking.highlighted.clone(),
    }
}

/// Colors for every bar of every axis: the axis' default color, with highlighted
/// bars in the axis' highlight color. A three-axis chart shifts both palettes
/// right by one so the first axis takes the last color.
pub fn bar_colors(series: &ChartSeries, palette: &Palette) -> Vec<Vec<String>> {
    let shift = if series.uses_all_axes() { 1 } else { 0 };
    let pick = |colors: &[String], axis: usize| -> String {
        if colors.is_empty() {
            return String::new();
        }
        let n = colors.len();
        colors[(axis + n - shift % n) % n].clone()
    };

    (0..series.axes.len())
        .map(|axis| {
            let default = pick(&palette.default_colors, axis);
            let highlight = pick(&palette.highlight_colors, axis);
            (0..series.len())
                .map(|position| {
                    if series.highlighted.contains(&position) {
                        highlight.clone()
                    } else {
                        default.clone()
                    }
                })
                .collect()
        })
        .collect()
}
