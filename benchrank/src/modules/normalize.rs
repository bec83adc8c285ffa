use crate::{
    error::{Error, Result},
    schemas::{
        benchmark::{BenchmarkKind, PercentageDiff},
        device::Device,
    },
};

/// The outcome of comparing a ranked set of devices against its reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalization {
    /// Position of the reference device in the input.
    pub reference: usize,
    pub reference_score: i64,
    /// One entry per input device, in input order.
    pub diffs: Vec<PercentageDiff>,
}

/// Pick the reference device among `devices`.
///
/// The best-scoring highlighted device wins (ties go to the first one met);
/// without any highlighted device the best-scoring device overall wins
/// (ties go to the last one, i.e. the last element of an ascending ranking).
pub fn select_reference(kind: BenchmarkKind, devices: &[&Device]) -> Option<usize> {
    let score = |i: usize| devices[i].record(kind).total_score();

    let mut best: Option<usize> = None;
    for (i, _) in devices.iter().enumerate().filter(|(_, d)| d.is_highlighted()) {
        match best {
            Some(b) if score(b) >= score(i) => {}
            _ => best = Some(i),
        }
    }

    best.or_else(|| (0..devices.len()).max_by_key(|&i| score(i)))
}

/// Compare every device's total in `kind` against the reference device.
///
/// # Errors
/// [`Error::NoEligibleDevices`] for an empty input, and
/// [`Error::DegenerateReference`] if the reference does not have a positive total.
pub fn normalize(kind: BenchmarkKind, devices: &[&Device]) -> Result<Normalization> {
    let reference =
        select_reference(kind, devices).ok_or(Error::NoEligibleDevices { benchmark: kind })?;
    let reference_score = devices[reference].record(kind).total_score();
    if reference_score <= 0 {
        return Err(Error::DegenerateReference {
            benchmark: kind,
            device: devices[reference].name().to_string(),
            score: reference_score,
        });
    }

    let diffs = devices
        .iter()
        .map(|device| PercentageDiff::between(device.record(kind).total_score(), reference_score))
        .collect();

    Ok(Normalization {
        reference,
        reference_score,
        diffs,
    })
}

#[cfg(test)]
mod tests {
    use super::{normalize, select_reference};
    use crate::{
        error::Error,
        schemas::{
            benchmark::{BenchmarkKind, BenchmarkRecord, PercentageDiff},
            device::{Device, IncludeFlag},
        },
    };

    const KIND: BenchmarkKind = BenchmarkKind::Antutu7;

    fn device(name: &str, score: i64, include: IncludeFlag) -> Device {
        let mut device = Device::new(name);
        device.include = include;
        device
            .results
            .replace(BenchmarkRecord::new(KIND, &[score]).unwrap());
        device
    }

    #[test]
    fn test_single_highlighted_is_reference() {
        let devices = vec![
            device("a", 100, IncludeFlag::Normal),
            device("b", 150, IncludeFlag::Highlighted),
            device("c", 300, IncludeFlag::Normal),
        ];
        let refs: Vec<&Device> = devices.iter().collect();
        let normalization = normalize(KIND, &refs).unwrap();
        assert_eq!(normalization.reference, 1);
        assert_eq!(normalization.reference_score, 150);
        assert_eq!(
            normalization.diffs,
            vec![
                PercentageDiff::Below(34),
                PercentageDiff::Par,
                PercentageDiff::Above(100),
            ]
        );
    }

    #[test]
    fn test_best_highlighted_is_reference() {
        let devices = vec![
            device("a", 100, IncludeFlag::Highlighted),
            device("b", 200, IncludeFlag::Highlighted),
            device("c", 200, IncludeFlag::Highlighted),
            device("d", 400, IncludeFlag::Normal),
        ];
        let refs: Vec<&Device> = devices.iter().collect();
        assert_eq!(select_reference(KIND, &refs), Some(1));

        let normalization = normalize(KIND, &refs).unwrap();
        assert_eq!(normalization.diffs[0], PercentageDiff::Below(50));
        assert_eq!(normalization.diffs[1], PercentageDiff::Par);
        assert_eq!(normalization.diffs[2], PercentageDiff::Par);
        assert_eq!(normalization.diffs[3], PercentageDiff::Above(100));
    }

    #[test]
    fn test_best_overall_without_highlight() {
        let devices = vec![
            device("a", 100, IncludeFlag::Normal),
            device("b", 250, IncludeFlag::Normal),
            device("c", 250, IncludeFlag::Normal),
        ];
        let refs: Vec<&Device> = devices.iter().collect();
        assert_eq!(select_reference(KIND, &refs), Some(2));

        let normalization = normalize(KIND, &refs).unwrap();
        assert_eq!(normalization.diffs[0], PercentageDiff::Below(60));
        assert!(normalization.diffs[2].is_par());
    }

    #[test]
    fn test_signs_follow_reference() {
        let devices: Vec<Device> = [37, 99, 150, 151, 1000, 4003]
            .iter()
            .map(|&s| device("x", s, IncludeFlag::Normal))
            .chain(std::iter::once(device("ref", 150, IncludeFlag::Highlighted)))
            .collect();
        let refs: Vec<&Device> = devices.iter().collect();
        let normalization = normalize(KIND, &refs).unwrap();
        assert!(normalization.diffs[normalization.reference].is_par());
        for (device, diff) in devices.iter().zip(&normalization.diffs) {
            let score = device.record(KIND).total_score();
            let text = diff.to_string();
            if score < 150 {
                assert!(text.starts_with('-'), "{} -> {}", score, text);
            } else if score > 151 {
                assert!(text.starts_with('+'), "{} -> {}", score, text);
            } else {
                assert_eq!(text, "100");
            }
        }
    }

    #[test]
    fn test_degenerate_reference() {
        let devices = vec![
            device("a", 0, IncludeFlag::Highlighted),
            device("b", 120, IncludeFlag::Normal),
        ];
        let refs: Vec<&Device> = devices.iter().collect();
        match normalize(KIND, &refs) {
            Err(Error::DegenerateReference { device, score, .. }) => {
                assert_eq!(device, "a");
                assert_eq!(score, 0);
            }
            other => panic!("expected DegenerateReference, got {:?}", other),
        }

        assert!(matches!(
            normalize(KIND, &[]),
            Err(Error::NoEligibleDevices { .. })
        ));
    }
}
