#![deny(missing_docs)]

//! # Overview
//!
//! `sapient_xml` encodes and decodes the SAPIENT XML messages exchanged
//! with the SDA server: outbound `SensorRegistration` and `StatusReport`
//! (heartbeat), and inbound `SensorRegistrationACK` and `SensorTask`.
//!
//! # Design
//!
//! Outbound messages ([`registration::SensorRegistration`],
//! [`heartbeat::StatusReport`]) are built directly with [`quick_xml`]'s
//! element-writer API, since their shape never varies between messages of
//! the same type. Inbound messages are decoded by flattening the document
//! into dotted-path key/value pairs ([`walk::flatten`]) and looking up the
//! fields each message type cares about — robust to unexpected sibling
//! elements the SDA server might send, the same tolerance the original
//! node-walking parser had. [`factory::decode_inbound`] dispatches an
//! inbound document to its decoder by root element name.
//!
//! # Invariants
//!
//! - Encoders never fail except on a UTF-8 encoding defect, which cannot
//!   occur for the fixed ASCII vocabulary these messages use in practice.
//! - [`factory::decode_inbound`] returns `Ok(None)` rather than an error
//!   for a well-formed document whose root element isn't recognised.
//!
//! # Errors
//!
//! All fallible operations return [`error::XmlError`], covering malformed
//! XML, non-UTF-8 text, and fields that fail to parse as the type the
//! caller expected.

/// The `SensorRegistrationAck` inbound message.
pub mod ack;
/// The [`error::XmlError`] type returned by all fallible operations.
pub mod error;
/// Decodes inbound SAPIENT XML documents into their typed message.
pub mod factory;
/// The `StatusReport` heartbeat message.
pub mod heartbeat;
/// The `SensorRegistration` outbound message.
pub mod registration;
/// Task-related inbound message types.
pub mod task;
/// Generic XML tree walking helpers used by the decoders.
pub mod walk;

pub use ack::SensorRegistrationAck;
pub use error::XmlError;
pub use factory::{decode_inbound, InboundMessage};
pub use heartbeat::StatusReport;
pub use registration::SensorRegistration;
pub use task::SensorTask;
