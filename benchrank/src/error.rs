use crate::schemas::benchmark::{BenchmarkKind, SubScore};

/// Everything that can go wrong while ingesting tables or preparing a series.
///
/// None of these are recoverable at the point of detection: a broken row usually
/// means the column layout shifted, so the whole pass is abandoned.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed label {label:?}: expected \"name (attribute)\"")]
    MalformedLabel { label: String },

    #[error("{benchmark}: invalid {field} score {cell:?} for {device}")]
    InvalidScore {
        benchmark: BenchmarkKind,
        device: String,
        field: SubScore,
        cell: Option<String>,
    },

    #[error("invalid date {cell:?} for {device}, expected format {format:?}")]
    InvalidDate {
        device: String,
        cell: String,
        format: String,
    },

    #[error("{benchmark}: reference {device} has non-positive score {score}")]
    DegenerateReference {
        benchmark: BenchmarkKind,
        device: String,
        score: i64,
    },

    #[error("{benchmark}: no eligible devices to rank")]
    NoEligibleDevices { benchmark: BenchmarkKind },

    #[error("unknown benchmark type {name:?}")]
    UnknownBenchmarkType { name: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
