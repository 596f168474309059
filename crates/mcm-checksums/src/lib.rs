#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `mcm_checksums` provides the CRC-16 primitive shared by the framed
//! command/response codec (`mcm-codec`) and the mission-file upload sequence
//! (`mercury`). The mediator and the MCM must agree on the exact CRC of a
//! mission file before the MCM will accept it, so this crate exists to give
//! both call sites one streaming implementation rather than duplicating the
//! update loop.
//!
//! # Design
//!
//! [`Crc16`] wraps a [`crc::Digest`] configured with the CRC-16/IBM-3740
//! (CCITT-FALSE) polynomial, which is the variant most commonly used by
//! embedded serial command protocols of this shape. The type streams bytes
//! through [`Crc16::write`] so a caller can feed a file in bounded chunks
//! without buffering the whole thing, then read back the final value with
//! [`Crc16::finish`].
//!
//! # Invariants
//!
//! - [`Crc16::finish`] consumes the digest; a [`Crc16`] cannot be reused
//!   after finishing, matching the one-shot nature of a mission-file CRC.
//! - [`crc16_of_slice`] and streaming through [`Crc16`] over the same bytes
//!   (in any chunking) always produce the same result.
//!
//! # Errors
//!
//! This crate never fails; it has no I/O of its own. Callers that stream
//! from a file surface their own I/O errors.
//!
//! # Examples
//!
//! ```
//! use mcm_checksums::{Crc16, crc16_of_slice};
//!
//! let mut crc = Crc16::new();
//! crc.write(b"KT-956");
//! crc.write(b"-0185-00");
//! assert_eq!(crc.finish(), crc16_of_slice(b"KT-956-0185-00"));
//! ```

/// CRC-16/IBM-3740 (CCITT-FALSE): poly 0x1021, init 0xFFFF, no reflection,
/// no output XOR. Chosen as the most common CRC-16 variant used by embedded
/// serial command protocols of this shape; the original `base::Crc16` type
/// this is grounded on does not specify its polynomial in the retrieved
/// source, so this is a documented choice rather than a derived fact.
const CRC16_ALGORITHM: crc::Algorithm<u16> = crc::CRC_16_IBM_3740;

/// Streaming CRC-16 accumulator.
///
/// Mirrors the original `base::Crc16` class: bytes are fed in with
/// [`Crc16::write`] and the final checksum is retrieved with
/// [`Crc16::finish`].
pub struct Crc16 {
    digest: crc::Digest<'static, u16>,
}

impl Crc16 {
    /// Creates a new CRC-16 accumulator with no bytes consumed yet.
    #[must_use]
    pub fn new() -> Self {
        static CRC: crc::Crc<u16> = crc::Crc::<u16>::new(&CRC16_ALGORITHM);
        Self {
            digest: CRC.digest(),
        }
    }

    /// Feeds `bytes` into the running checksum.
    pub fn write(&mut self, bytes: &[u8]) {
        self.digest.update(bytes);
    }

    /// Consumes the accumulator and returns the final CRC-16 value.
    #[must_use]
    pub fn finish(self) -> u16 {
        self.digest.finalize()
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the CRC-16 of `data` in one call.
///
/// Equivalent to streaming the entire slice through a single [`Crc16`], but
/// convenient for callers that already hold the full buffer in memory.
#[must_use]
pub fn crc16_of_slice(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.write(data);
    crc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_deterministic() {
        assert_eq!(crc16_of_slice(b""), crc16_of_slice(b""));
    }

    #[test]
    fn chunked_and_whole_updates_agree() {
        let data: Vec<u8> = (0u8..=255).cycle().take(2048).collect();

        let whole = crc16_of_slice(&data);

        let mut streamed = Crc16::new();
        for chunk in data.chunks(253) {
            streamed.write(chunk);
        }
        assert_eq!(streamed.finish(), whole);
    }

    #[test]
    fn different_content_yields_different_crc() {
        assert_ne!(crc16_of_slice(b"mission-a"), crc16_of_slice(b"mission-b"));
    }

    #[test]
    fn thousand_byte_boundary_chunking_matches_single_pass() {
        let data: Vec<u8> = (0u8..=255).cycle().take(5000).collect();
        let whole = crc16_of_slice(&data);

        let mut streamed = Crc16::new();
        for chunk in data.chunks(1024) {
            streamed.write(chunk);
        }
        assert_eq!(streamed.finish(), whole);
    }
}
