#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `med_cli` parses the mediator's command line and wires the downstream
//! (`mercury`) and upstream (`sapient_session`) loops together behind one
//! shared [`mode_arbiter::ModeArbiter`].
//!
//! # Design
//!
//! [`args::Args`] is a `clap`-derived positional argument parser matching
//! `<prog> <server-ip> [<server-port>] [<serial-dev>] [-d]`. [`run::run`]
//! is the process body: initialise logging, run the mission-file existence
//! diagnostic, construct the serial adapter and the shared arbiter, then
//! run both sessions concurrently via `tokio::join!`.

/// The `clap`-derived command line argument parser.
pub mod args;
/// The process body wiring the downstream and upstream loops together.
pub mod run;

pub use args::Args;
pub use run::run;
