use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::frame::{Frame, FrameError, decode_frame};

/// Interval between pumps while waiting for a message. A short sleep keeps
/// the poll loop from spinning the CPU while still reacting quickly to
/// newly arrived bytes.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Framed message codec for the MCM serial link.
///
/// Owns a receive buffer, decodes complete [`Frame`]s out of it as bytes
/// arrive, and exposes a cooperative `wait_for_message_available(timeout,
/// pump)` pattern the downstream controller drives its protocol with.
#[derive(Default)]
pub struct Codec {
    recv_buf: Vec<u8>,
    pending: VecDeque<Frame>,
}

impl Codec {
    /// Creates an empty codec with no buffered bytes or pending messages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds newly read bytes into the codec, decoding as many complete
    /// frames as possible and queuing them for [`Codec::pop_message`].
    pub fn ingest(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.recv_buf.extend_from_slice(bytes);

        loop {
            match decode_frame(&self.recv_buf) {
                Ok((frame, consumed)) => {
                    self.recv_buf.drain(..consumed);
                    self.pending.push_back(frame);
                }
                Err(FrameError::Incomplete) => break,
                Err(_) => {
                    // Corrupt frame: drop the leading STX and resynchronise.
                    if self.recv_buf.is_empty() {
                        break;
                    }
                    self.recv_buf.remove(0);
                }
            }
        }
    }

    /// Removes and returns the next queued message, if any.
    pub fn pop_message(&mut self) -> Option<Frame> {
        self.pending.pop_front()
    }

    /// Discards every currently queued message, so a newly sent request is
    /// never matched against a stale response left over from before it.
    pub fn drain_stale(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Encodes `frame` to its wire bytes.
    #[must_use]
    pub fn encode(frame: &Frame) -> Vec<u8> {
        frame.encode()
    }

    /// Waits up to `timeout` for a message to become available, calling
    /// `pump` repeatedly to pull freshly read bytes from the underlying
    /// transport. Returns `true` as soon as a message is queued, `false` on
    /// timeout.
    pub async fn wait_for_message_available<F>(&mut self, timeout: Duration, mut pump: F) -> bool
    where
        F: FnMut() -> Vec<u8>,
    {
        let deadline = Instant::now() + timeout;
        loop {
            let bytes = pump();
            self.ingest(&bytes);
            if !self.pending.is_empty() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(POLL_INTERVAL.min(deadline - Instant::now())).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Module;

    #[test]
    fn ingest_decodes_multiple_queued_frames() {
        let mut codec = Codec::new();
        let a = Frame::command(Module::Mcm, vec![1]);
        let b = Frame::command(Module::Mcm, vec![2]);
        let mut wire = a.encode();
        wire.extend(b.encode());

        codec.ingest(&wire);

        assert_eq!(codec.pop_message(), Some(a));
        assert_eq!(codec.pop_message(), Some(b));
        assert_eq!(codec.pop_message(), None);
    }

    #[test]
    fn ingest_handles_byte_at_a_time_delivery() {
        let mut codec = Codec::new();
        let frame = Frame::command(Module::Mcm, vec![9, 9, 9]);
        for byte in frame.encode() {
            codec.ingest(&[byte]);
        }
        assert_eq!(codec.pop_message(), Some(frame));
    }

    #[test]
    fn drain_stale_discards_queued_messages() {
        let mut codec = Codec::new();
        codec.ingest(&Frame::command(Module::Mcm, vec![1]).encode());
        assert_eq!(codec.drain_stale(), 1);
        assert_eq!(codec.pop_message(), None);
    }

    #[tokio::test]
    async fn wait_for_message_available_returns_once_pumped_bytes_decode() {
        let mut codec = Codec::new();
        let frame = Frame::command(Module::Mcm, vec![5]);
        let wire = frame.encode();
        let mut delivered = false;

        let ok = codec
            .wait_for_message_available(Duration::from_millis(500), || {
                if delivered {
                    Vec::new()
                } else {
                    delivered = true;
                    wire.clone()
                }
            })
            .await;

        assert!(ok);
        assert_eq!(codec.pop_message(), Some(frame));
    }

    #[tokio::test]
    async fn wait_for_message_available_times_out_with_no_data() {
        let mut codec = Codec::new();
        let ok = codec
            .wait_for_message_available(Duration::from_millis(30), Vec::new)
            .await;
        assert!(!ok);
    }
}
