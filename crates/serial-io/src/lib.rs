#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `serial_io` provides the non-blocking serial transport the `mercury`
//! downstream controller drives: open/reopen on demand, drain whatever
//! bytes are available without blocking, and report liveness so the
//! controller's outer loop knows when to reopen the device.
//!
//! # Design
//!
//! [`SerialAdapter`] is the narrow contract `mercury` depends on, kept
//! independent of any particular transport so the controller can be tested
//! against [`memory::MemorySerialAdapter`] without a real device attached.
//! [`LinuxSerialAdapter`] is the production implementation, built on the
//! [`serialport`] crate and configured for the jamming appliance's serial
//! link: 8 data bits, no parity, 1 stop bit, no flow control, no canonical
//! processing, and a read call that returns immediately with whatever bytes
//! (if any) are currently available.
//!
//! # Invariants
//!
//! - [`SerialAdapter::read`] never blocks for longer than a few
//!   milliseconds; it is meant to be polled cooperatively by
//!   `mcm_codec::Codec::wait_for_message_available`.
//! - [`SerialAdapter::is_good`] becomes `false` the moment a write or open
//!   fails, and stays `false` until [`SerialAdapter::reinitialise`]
//!   succeeds.
//!
//! # Errors
//!
//! Open/reconfigure failures are logged and reflected in
//! [`SerialAdapter::is_good`] rather than propagated; the outer reconnect
//! loop lives in `mercury`, not here.

use std::io;
use std::time::Duration;

pub mod memory;

/// Baud rate the jamming appliance's serial link runs at: 115200 8N1.
pub const DEFAULT_BAUD: u32 = 115_200;

/// Maximum number of bytes read from the device in a single poll.
const READ_CHUNK: usize = 255;

/// Narrow contract the downstream controller needs from a serial transport.
pub trait SerialAdapter {
    /// Writes `data` to the device, returning the number of bytes actually
    /// written. A short write marks the adapter not-good.
    fn write_raw(&mut self, data: &[u8]) -> usize;

    /// Performs one non-blocking read, returning whatever bytes (up to 255)
    /// were immediately available. An empty result is the common case.
    fn read(&mut self) -> Vec<u8>;

    /// Reports whether the device is currently usable.
    fn is_good(&self) -> bool;

    /// Closes the device, if open.
    fn deinitialise(&mut self);

    /// Closes (if needed) and reopens the device at `baud`, updating
    /// [`SerialAdapter::is_good`] to reflect the outcome.
    fn reinitialise(&mut self, baud: u32);
}

/// Production serial adapter backed by the `serialport` crate.
pub struct LinuxSerialAdapter {
    node: String,
    port: Option<Box<dyn serialport::SerialPort>>,
    is_good: bool,
}

impl LinuxSerialAdapter {
    /// Creates an adapter for the given device node (e.g. `/dev/ttyUSB0`)
    /// and immediately attempts to open it at [`DEFAULT_BAUD`].
    #[must_use]
    pub fn new(node: impl Into<String>) -> Self {
        let mut adapter = Self {
            node: node.into(),
            port: None,
            is_good: false,
        };
        adapter.reinitialise(DEFAULT_BAUD);
        adapter
    }
}

impl SerialAdapter for LinuxSerialAdapter {
    fn write_raw(&mut self, data: &[u8]) -> usize {
        let Some(port) = self.port.as_mut() else {
            return 0;
        };
        match port.write(data) {
            Ok(written) => {
                self.is_good = written == data.len();
                if !self.is_good {
                    tracing::error!(written, expected = data.len(), "serial write error");
                }
                let _ = port.flush();
                written
            }
            Err(err) => {
                tracing::error!(%err, "serial write failed");
                self.is_good = false;
                0
            }
        }
    }

    fn read(&mut self) -> Vec<u8> {
        let Some(port) = self.port.as_mut() else {
            return Vec::new();
        };
        let mut buf = [0u8; READ_CHUNK];
        match port.read(&mut buf) {
            Ok(0) => Vec::new(),
            Ok(n) => buf[..n].to_vec(),
            Err(err) if err.kind() == io::ErrorKind::TimedOut => Vec::new(),
            Err(err) => {
                tracing::error!(%err, "serial read failed");
                self.is_good = false;
                Vec::new()
            }
        }
    }

    fn is_good(&self) -> bool {
        self.is_good
    }

    fn deinitialise(&mut self) {
        if self.port.take().is_some() {
            tracing::info!(node = %self.node, "closed serial device");
        }
        self.is_good = false;
    }

    fn reinitialise(&mut self, baud: u32) {
        self.deinitialise();
        let opened = serialport::new(&self.node, baud)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(Duration::from_millis(1))
            .open();

        match opened {
            Ok(port) => {
                self.port = Some(port);
                self.is_good = true;
                tracing::info!(node = %self.node, "opened serial device");
            }
            Err(err) => {
                tracing::error!(node = %self.node, %err, "failed to open serial device");
                self.is_good = false;
            }
        }
    }
}
