#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `med_logging` wires the process's `tracing` instrumentation to stderr,
//! standing in for the syslog output the original mediator used: every
//! other crate in this workspace logs through `tracing`, and this is the
//! one place that decides where those events go.
//!
//! # Design
//!
//! [`init`] installs a [`tracing_subscriber::fmt`] subscriber filtered by
//! [`tracing_subscriber::EnvFilter`], defaulting to `info` so the startup
//! diagnostics and both session loops are visible without configuration,
//! and overridable with `RUST_LOG` for local debugging.

use tracing_subscriber::EnvFilter;

/// Installs the process-wide `tracing` subscriber.
///
/// Safe to call once per process; a second call is a logic error in the
/// caller, not something this function guards against, since only
/// `med-cli`'s `main` ever calls it.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
