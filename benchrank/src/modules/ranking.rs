use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    error::Result,
    modules::{normalize::normalize, registry::Registry},
    schemas::{benchmark::BenchmarkKind, device::Device},
};

/// At most this many devices, the most recently tested ones, make it onto a chart.
pub const WINDOW: usize = 30;

/// Devices of one benchmark in plot order, lowest total first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    pub benchmark: BenchmarkKind,
    /// Positions in [`Registry::devices`], in plot order.
    pub order: Vec<usize>,
    /// Positions within `order` of the highlighted devices.
    pub highlighted: BTreeSet<usize>,
    /// Position within `order` of the reference device.
    pub reference: usize,
}

/// Whether a device can be plotted for `kind`: it has a date, a positive total, and is not excluded.
pub fn is_eligible(device: &Device, kind: BenchmarkKind) -> bool {
    device.observed_at.is_some() && device.record(kind).total_score() > 0 && !device.is_excluded()
}

/// Rank the registry for one benchmark and store each ranked device's percentage difference.
///
/// Eligible devices are sorted by date and cut to the [`WINDOW`] most recent,
/// then re-sorted by total score. Both sorts are stable. Differences left over
/// from an earlier pass of the same benchmark are cleared first, so a device that
/// dropped out of the window carries none.
///
/// # Errors
/// See [`normalize`]. The registry is left untouched on error.
pub fn rank(registry: &mut Registry, kind: BenchmarkKind) -> Result<Ranking> {
    let devices = registry.devices();

    let mut order: Vec<usize> = (0..devices.len())
        .filter(|&i| is_eligible(&devices[i], kind))
        .collect();
    let eligible = order.len();

    order.sort_by_key(|&i| devices[i].observed_at);
    if order.len() > WINDOW {
        let excess = order.len() - WINDOW;
        order.drain(..excess);
    }
    order.sort_by_key(|&i| devices[i].record(kind).total_score());

    let ranked: Vec<&Device> = order.iter().map(|&i| &devices[i]).collect();
    let normalization = normalize(kind, &ranked)?;

    let highlighted: BTreeSet<usize> = ranked
        .iter()
        .enumerate()
        .filter(|(_, device)| device.is_highlighted())
        .map(|(position, _)| position)
        .collect();

    debug!(
        benchmark = %kind,
        eligible,
        ranked = order.len(),
        reference = %ranked[normalization.reference].name(),
        reference_score = normalization.reference_score,
        "ranked devices"
    );

    let devices = registry.devices_mut();
    for device in devices.iter_mut() {
        device.results.get_mut(kind).percentage_diff = None;
    }
    for (&i, diff) in order.iter().zip(normalization.diffs) {
        devices[i].results.get_mut(kind).percentage_diff = Some(diff);
    }

    Ok(Ranking {
        benchmark: kind,
        order,
        highlighted,
        reference: normalization.reference,
    })
}
