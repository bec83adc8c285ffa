//! Merge smartphone benchmark tables and rank devices for bar charts.
//!
//! Each benchmark lives in its own table whose rows look like
//! `marker, date, "Name (chip or battery)", score...`. [`Aggregator::load`]
//! reads all of them into one [`modules::registry::Registry`], and
//! [`Aggregator::prepare`] turns one benchmark into a [`modules::series::ChartSeries`]:
//! the 30 most recently tested devices, sorted by score, each labelled with
//! its difference from a reference device.

pub mod aggregator;
pub mod common;
pub mod config;
pub mod diagnostics;
pub mod error;

pub mod modules {
    pub mod export;
    pub mod ingest;
    pub mod normalize;
    pub mod ranking;
    pub mod registry;
    pub mod series;
    pub mod sheets;
}

pub mod schemas {
    pub mod benchmark;
    pub mod device;
}

pub use aggregator::Aggregator;
pub use chrono;
pub use config::Settings;
pub use error::{Error, Result};
