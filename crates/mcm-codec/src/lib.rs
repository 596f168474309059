#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `mcm_codec` implements the length-framed, CRC-protected command/response
//! protocol the mediator speaks to the MCM over the serial line: 253-byte
//! data chunking, a single inter-packet delay before CRC verification, and
//! per-command reply timeouts.
//!
//! # Design
//!
//! - [`module`] names the addressable module (only the MCM itself, today).
//! - [`command`] defines the closed set of command/response header ids.
//! - [`frame`] defines the wire envelope and its encode/decode functions.
//! - [`request`] builds outbound request frames for every command the
//!   mediator issues.
//! - [`response`] decodes the typed response payloads that follow certain
//!   command headers (`GetState`, `GetSoftwareVersionNumber`,
//!   `GetMissionName`, `GetMissionFileInstallProgress`).
//! - [`Codec`] owns the receive buffer and the cooperative
//!   `waitForMessageAvailable(timeout, pump)` poll loop that the downstream
//!   controller drives.
//!
//! # Invariants
//!
//! - A frame is only ever handed to the caller once its CRC-16 has been
//!   verified; corrupted frames are silently skipped byte-by-byte until the
//!   stream resynchronises on a valid `STX`.
//! - [`request::data_chunk`] never emits a payload larger than
//!   [`request::MAX_DATA_CHUNK_BYTES`], so a 253-byte read always produces
//!   exactly one data frame.
//!
//! # Errors
//!
//! [`frame::FrameError`] reports malformed frames; [`response::ResponseError`]
//! reports response payloads too short for the type being decoded. Neither
//! type performs I/O, so callers attach their own transport errors.
//!
//! # Examples
//!
//! ```
//! use mcm_codec::{Codec, request};
//!
//! let ping = request::ping();
//! let wire = ping.encode();
//!
//! let mut codec = Codec::new();
//! codec.ingest(&wire);
//! assert_eq!(codec.pop_message(), Some(ping));
//! ```

/// The receive buffer and message-framing poll loop.
pub mod codec;
/// The closed set of command/response header ids.
pub mod command;
/// The wire envelope and its encode/decode functions.
pub mod frame;
/// The addressable module identifiers.
pub mod module;
/// Outbound request frame builders.
pub mod request;
/// Typed response payload decoders.
pub mod response;

pub use codec::Codec;
pub use command::CommandId;
pub use frame::{Frame, FrameError, FrameKind};
pub use module::Module;
