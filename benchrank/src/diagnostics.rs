//! Logging setup.
//!
//! The library only emits `tracing` events; binaries and tests that want to see
//! them call [`init_tracing`] once at startup.
//!
//! - `BENCHRANK_LOG` unset: `benchrank=info`
//! - `BENCHRANK_LOG=benchrank=debug`: per-row merge details and ranking summaries

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install a stderr subscriber filtered by `BENCHRANK_LOG`. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("BENCHRANK_LOG")
            .unwrap_or_else(|_| EnvFilter::new("benchrank=info"));

        /* another subscriber may already be installed by the embedding program */
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .try_init();
    });
}
