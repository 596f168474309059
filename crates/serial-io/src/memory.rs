//! In-memory [`SerialAdapter`] used by `mercury`'s test suite to drive the
//! downstream controller's state machine without a real device attached.

use std::collections::VecDeque;

use crate::SerialAdapter;

/// A [`SerialAdapter`] backed by in-memory queues.
///
/// Tests queue up replies the "MCM" would have sent with
/// [`MemorySerialAdapter::push_inbound`] and inspect what the controller
/// wrote with [`MemorySerialAdapter::take_written`]. Each call to
/// `push_inbound` is kept as one discrete chunk: [`SerialAdapter::read`]
/// never coalesces two separately pushed replies into the same read, only
/// splitting a single chunk across reads if it is over 255 bytes. This
/// keeps a test's scripted sequence of replies from bleeding into each
/// other when a controller issues several requests back to back.
#[derive(Default)]
pub struct MemorySerialAdapter {
    inbound: VecDeque<Vec<u8>>,
    written: Vec<u8>,
    good: bool,
}

impl MemorySerialAdapter {
    /// Creates an adapter that reports itself as good immediately, as if
    /// the device had just opened successfully.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inbound: VecDeque::new(),
            written: Vec::new(),
            good: true,
        }
    }

    /// Queues one reply to be returned by future [`SerialAdapter::read`]
    /// calls, as its own chunk.
    pub fn push_inbound(&mut self, bytes: &[u8]) {
        self.inbound.push_back(bytes.to_vec());
    }

    /// Returns and clears everything written so far via
    /// [`SerialAdapter::write_raw`].
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }

    /// Forces [`SerialAdapter::is_good`] to report `false`, simulating a
    /// lost device.
    pub fn fail(&mut self) {
        self.good = false;
    }
}

impl SerialAdapter for MemorySerialAdapter {
    fn write_raw(&mut self, data: &[u8]) -> usize {
        if !self.good {
            return 0;
        }
        self.written.extend_from_slice(data);
        data.len()
    }

    fn read(&mut self) -> Vec<u8> {
        let Some(front) = self.inbound.front_mut() else {
            return Vec::new();
        };
        if front.len() <= 255 {
            self.inbound.pop_front().unwrap_or_default()
        } else {
            front.drain(..255).collect()
        }
    }

    fn is_good(&self) -> bool {
        self.good
    }

    fn deinitialise(&mut self) {
        self.good = false;
    }

    fn reinitialise(&mut self, _baud: u32) {
        self.good = true;
    }
}
