//! `vc-pulse` library crate.
//!
//! The binary (`vcp`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future GUI/daemon, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod agg;
pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod tui;

/// Install an env-filtered fmt subscriber (`RUST_LOG`-style filtering).
///
/// The library itself never installs one; embedders opt in via the
/// `telemetry` feature.
#[cfg(feature = "telemetry")]
pub fn init_telemetry() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
