use crate::module::Module;
use mcm_checksums::crc16_of_slice;

const STX: u8 = 0x02;
const ETX: u8 = 0x03;
/// `STX + recipient + kind + len_lo + len_hi`.
const HEADER_LEN: usize = 5;
/// `crc_lo + crc_hi + ETX`.
const TRAILER_LEN: usize = 3;

/// Whether a frame's payload is a command/response header (followed by an
/// optional typed response) or something else. This mediator only ever
/// sends and expects `Command` frames, so `Other` exists purely so
/// `is_command_message` can be honest about frames that do not match.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameKind {
    /// A command or command-response payload.
    Command,
    /// Some other frame kind, identified by its raw wire byte.
    Other(u8),
}

impl FrameKind {
    fn to_byte(self) -> u8 {
        match self {
            FrameKind::Command => 0,
            FrameKind::Other(byte) => byte,
        }
    }

    fn from_byte(byte: u8) -> Self {
        match byte {
            0 => FrameKind::Command,
            other => FrameKind::Other(other),
        }
    }
}

/// A single length-framed, CRC-protected message exchanged with the MCM.
///
/// Wire layout: `STX, recipient, kind, len(u16 LE), payload, crc16(u16 LE),
/// ETX`, with the CRC computed over the recipient, kind, length, and
/// payload bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    /// The module this frame is addressed to (on send) or came from (on receive).
    pub recipient: Module,
    /// The kind of payload this frame carries.
    pub kind: FrameKind,
    /// Raw payload bytes: for `FrameKind::Command` this begins with the
    /// command id byte, optionally followed by a typed response.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Builds a command frame addressed to `recipient`.
    #[must_use]
    pub fn command(recipient: Module, payload: Vec<u8>) -> Self {
        Self {
            recipient,
            kind: FrameKind::Command,
            payload,
        }
    }

    /// Reports whether this frame carries a command/response payload.
    #[must_use]
    pub fn is_command_message(&self) -> bool {
        self.kind == FrameKind::Command
    }

    /// Encodes the frame to its wire representation.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let len = self.payload.len() as u16;
        let mut body = Vec::with_capacity(3 + self.payload.len());
        body.push(self.recipient.into());
        body.push(self.kind.to_byte());
        body.extend_from_slice(&len.to_le_bytes());
        body.extend_from_slice(&self.payload);

        let crc = crc16_of_slice(&body);

        let mut wire = Vec::with_capacity(1 + body.len() + TRAILER_LEN);
        wire.push(STX);
        wire.extend_from_slice(&body);
        wire.extend_from_slice(&crc.to_le_bytes());
        wire.push(ETX);
        wire
    }
}

/// Errors that can occur while decoding a byte buffer into a [`Frame`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum FrameError {
    /// Not enough bytes are buffered yet to decode a complete frame.
    #[error("incomplete frame")]
    Incomplete,
    /// The frame's CRC-16 trailer did not match the computed checksum.
    #[error("frame CRC mismatch")]
    CrcMismatch,
    /// The byte after the payload/CRC was not `ETX`.
    #[error("frame missing ETX terminator")]
    MissingEtx,
    /// The recipient byte did not identify a known module.
    #[error("unknown recipient module {0:#04x}")]
    UnknownModule(u8),
}

/// Attempts to decode one frame from the front of `buf`.
///
/// On success, returns the decoded frame and the number of bytes consumed
/// from `buf` (the caller is responsible for draining them). On
/// [`FrameError::Incomplete`], no bytes should be consumed — more data is
/// needed. On any other error, the caller should skip past the offending
/// `STX` (consuming 1 byte) and retry, to resynchronise on a corrupted
/// stream.
pub fn decode_frame(buf: &[u8]) -> Result<(Frame, usize), FrameError> {
    let stx_pos = buf
        .iter()
        .position(|&b| b == STX)
        .ok_or(FrameError::Incomplete)?;
    let buf = &buf[stx_pos..];

    if buf.len() < HEADER_LEN {
        return Err(FrameError::Incomplete);
    }

    let recipient_byte = buf[1];
    let kind_byte = buf[2];
    let len = u16::from_le_bytes([buf[3], buf[4]]) as usize;

    let total = HEADER_LEN + len + TRAILER_LEN;
    if buf.len() < total {
        return Err(FrameError::Incomplete);
    }

    let payload = &buf[HEADER_LEN..HEADER_LEN + len];
    let crc_bytes = &buf[HEADER_LEN + len..HEADER_LEN + len + 2];
    let etx = buf[HEADER_LEN + len + 2];

    if etx != ETX {
        return Err(FrameError::MissingEtx);
    }

    let expected_crc = u16::from_le_bytes([crc_bytes[0], crc_bytes[1]]);
    let actual_crc = crc16_of_slice(&buf[1..HEADER_LEN + len]);
    if expected_crc != actual_crc {
        return Err(FrameError::CrcMismatch);
    }

    let recipient =
        Module::try_from(recipient_byte).map_err(FrameError::UnknownModule)?;

    let frame = Frame {
        recipient,
        kind: FrameKind::from_byte(kind_byte),
        payload: payload.to_vec(),
    };

    Ok((frame, stx_pos + total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_command_frame() {
        let frame = Frame::command(Module::Mcm, vec![0x02]);
        let wire = frame.encode();
        let (decoded, consumed) = decode_frame(&wire).unwrap();
        assert_eq!(consumed, wire.len());
        assert_eq!(decoded, frame);
        assert!(decoded.is_command_message());
    }

    #[test]
    fn detects_crc_corruption() {
        let frame = Frame::command(Module::Mcm, vec![1, 2, 3]);
        let mut wire = frame.encode();
        let last = wire.len() - 2;
        wire[last] ^= 0xFF;
        assert_eq!(decode_frame(&wire), Err(FrameError::CrcMismatch));
    }

    #[test]
    fn incomplete_buffer_reports_incomplete() {
        let frame = Frame::command(Module::Mcm, vec![1, 2, 3, 4, 5]);
        let wire = frame.encode();
        assert_eq!(
            decode_frame(&wire[..wire.len() - 1]),
            Err(FrameError::Incomplete)
        );
    }

    #[test]
    fn resynchronises_past_garbage_before_stx() {
        let frame = Frame::command(Module::Mcm, vec![9]);
        let mut wire = vec![0xAA, 0xBB, 0xCC];
        wire.extend(frame.encode());
        let (decoded, consumed) = decode_frame(&wire).unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(consumed, wire.len());
    }

    #[test]
    fn two_back_to_back_frames_decode_independently() {
        let a = Frame::command(Module::Mcm, vec![1]);
        let b = Frame::command(Module::Mcm, vec![2, 3]);
        let mut wire = a.encode();
        wire.extend(b.encode());

        let (decoded_a, consumed_a) = decode_frame(&wire).unwrap();
        assert_eq!(decoded_a, a);
        let (decoded_b, _) = decode_frame(&wire[consumed_a..]).unwrap();
        assert_eq!(decoded_b, b);
    }
}
