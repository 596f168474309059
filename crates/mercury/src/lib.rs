#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `mercury` is the downstream half of the mediator: it owns the serial
//! connection to the jamming appliance, translates the latched composite
//! mode from [`mode_arbiter::ModeArbiter`] into mission uploads and
//! jam/stop commands, and reports the device's session state back to the
//! rest of the process.
//!
//! # Design
//!
//! - [`controller::Controller`] is the protocol state machine: ping,
//!   state/version/mission-name queries, mission upload, and jam control,
//!   built entirely on `mcm_codec`'s request/response types and generic
//!   over [`serial_io::SerialAdapter`] so it can be driven against
//!   [`serial_io::memory::MemorySerialAdapter`] in tests.
//! - [`controller::run`] is the outer loop: open the serial device, drive
//!   the controller's inner loop (one [`controller::Controller::tick`] per
//!   iteration) until the device goes bad, back off, reopen, repeat.
//! - [`TargetState`] and [`ControllerState`] separate what the device
//!   reports from what this controller believes about its own session.
//! - [`Version`] and [`MIN_TARGET_VERSION`] gate mission uploads on
//!   firmware new enough to understand them.
//!
//! # Invariants
//!
//! - The controller never attempts a mission upload without first
//!   confirming [`Version::meets_minimum`] against [`MIN_TARGET_VERSION`].
//! - A reload is only skipped when the device already reports the exact
//!   mission name [`mode_arbiter::mission_name`] computes for the current
//!   mode; any decode failure while checking forces a reload.
//!
//! # Errors
//!
//! Serial and protocol failures are not propagated as `Result` — they
//! surface as `false`/`None` return values and `tracing` warnings, mirroring
//! the three-tier transient/protocol/fatal split the rest of the mediator
//! uses: nothing here is fatal to the process, only to the current attempt.

/// The protocol state machine and outer run loop.
pub mod controller;
/// What this controller believes about its own session.
pub mod state;
/// What the device reports about its own state.
pub mod target_state;
/// Firmware version comparison and the minimum supported version.
pub mod version;

pub use controller::{run, Controller};
pub use state::ControllerState;
pub use target_state::TargetState;
pub use version::{Version, MIN_TARGET_VERSION};
