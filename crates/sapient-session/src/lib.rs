#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `sapient_session` is the upstream half of the mediator: it owns the TCP
//! connection to the SAPIENT server, registers this sensor, sends periodic
//! heartbeats, and decodes inbound tasks into mode changes on a shared
//! [`mode_arbiter::ModeArbiter`].
//!
//! # Design
//!
//! [`session::run`] is the whole crate's entry point: an outer
//! connect/backoff loop wrapping an inner `tokio::select!` loop that
//! multiplexes the heartbeat timer, the registration-ack deadline, and
//! socket reads — the async equivalent of the single-threaded poll loop
//! this protocol was originally driven by.
//!
//! # Invariants
//!
//! - The session always identifies itself with the fixed sensor ID in
//!   [`session::SessionConfig`]'s caller-independent constant, never the ID
//!   a `SensorRegistrationACK` reports back.
//! - A `SensorTask` is only acted on while `Registered`, and only when its
//!   `sensorID` matches this session's own.
//!
//! # Errors
//!
//! Connection and write failures end the current session and fall through
//! to the outer reconnect loop; they are never surfaced as `Result` to
//! `sapient_session::run`'s caller, which runs forever by design.

/// The connect/backoff loop and inner multiplexed event loop.
pub mod session;

pub use session::{run, SessionConfig};
