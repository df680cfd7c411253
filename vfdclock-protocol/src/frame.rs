//! Control-surface framing
//!
//! ```text
//! A5 | len | type | payload (len bytes, at most 64) | xor(len, type, payload)
//! ```
//!
//! The host and the clock use the same layout in both directions.
//! [`FrameParser`] collects one frame at a time in a single buffer and only
//! checks it once the declared length has arrived. Bytes seen while no
//! frame is open are line noise and are dropped.

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xA5;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 64;

/// START, LENGTH, TYPE and CHECKSUM
const OVERHEAD: usize = 4;

/// Largest encoded frame
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + OVERHEAD;

/// Encoded frame, ready for the UART
pub type WireBytes = Vec<u8, MAX_FRAME_SIZE>;

/// Framing failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload longer than [`MAX_PAYLOAD_SIZE`]
    Oversized,
    /// Trailing XOR byte did not match
    Checksum,
    /// Bytes do not form a frame, or the frame does not decode to a message
    Malformed,
}

/// One message on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        Vec::from_slice(payload)
            .map(|payload| Self { msg_type, payload })
            .map_err(|()| FrameError::Oversized)
    }

    /// Wire bytes for this frame
    pub fn encode(&self) -> WireBytes {
        let len = self.payload.len() as u8;
        let mut out = WireBytes::new();
        // The payload is capped at MAX_PAYLOAD_SIZE, so none of these can fail
        let _ = out.extend_from_slice(&[FRAME_START, len, self.msg_type]);
        let _ = out.extend_from_slice(&self.payload);
        let _ = out.push(xor_sum(len, self.msg_type, &self.payload));
        out
    }

    /// Check and unpack one complete frame
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        match bytes {
            [FRAME_START, len, msg_type, body @ .., check] if body.len() == usize::from(*len) => {
                if xor_sum(*len, *msg_type, body) != *check {
                    return Err(FrameError::Checksum);
                }
                Self::new(*msg_type, body)
            }
            _ => Err(FrameError::Malformed),
        }
    }
}

fn xor_sum(len: u8, msg_type: u8, payload: &[u8]) -> u8 {
    payload.iter().fold(len ^ msg_type, |acc, &b| acc ^ b)
}

/// Reassembles frames from a byte stream
#[derive(Debug, Clone, Default)]
pub struct FrameParser {
    pending: WireBytes,
}

impl FrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes held for the frame in progress, 0 while waiting for START
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Take one byte off the wire
    ///
    /// Yields a frame when its checksum byte arrives. A bad LENGTH or
    /// checksum drops the frame in progress and the parser goes back to
    /// hunting for START.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        if self.pending.is_empty() {
            if byte == FRAME_START {
                let _ = self.pending.push(byte);
            }
            return Ok(None);
        }

        if self.pending.len() == 1 && usize::from(byte) > MAX_PAYLOAD_SIZE {
            self.pending.clear();
            return Err(FrameError::Oversized);
        }

        // LENGTH was capped above, so a frame never outgrows the buffer
        let _ = self.pending.push(byte);
        let declared = usize::from(self.pending[1]);
        if self.pending.len() < declared + OVERHEAD {
            return Ok(None);
        }

        let frame = Frame::decode(&self.pending);
        self.pending.clear();
        frame.map(Some)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use proptest::prelude::*;
    use std::vec::Vec as StdVec;

    /// Feed every byte, collecting frames and errors in arrival order
    fn run(parser: &mut FrameParser, bytes: &[u8]) -> StdVec<Result<Frame, FrameError>> {
        bytes
            .iter()
            .filter_map(|&b| parser.feed(b).transpose())
            .collect()
    }

    #[test]
    fn test_wire_layout() {
        let frame = Frame::new(0x05, &[2, b'H', b'I']).unwrap();
        assert_eq!(
            frame.encode().as_slice(),
            &[0xA5, 3, 0x05, 2, b'H', b'I', 3 ^ 0x05 ^ 2 ^ b'H' ^ b'I']
        );

        let bare = Frame::new(0x07, &[]).unwrap();
        assert_eq!(bare.encode().as_slice(), &[0xA5, 0, 0x07, 0x07]);
    }

    #[test]
    fn test_decode_rejects_truncated_and_padded() {
        let encoded = Frame::new(0x01, &[1]).unwrap().encode();
        assert_eq!(
            Frame::decode(&encoded[..encoded.len() - 1]),
            Err(FrameError::Malformed)
        );

        let mut padded = encoded.clone();
        padded.push(0).unwrap();
        assert_eq!(Frame::decode(&padded), Err(FrameError::Malformed));
        assert_eq!(Frame::decode(&[]), Err(FrameError::Malformed));
    }

    #[test]
    fn test_checksum_mismatch_drops_frame() {
        let mut encoded = Frame::new(0x02, &[]).unwrap().encode();
        let last = encoded.len() - 1;
        encoded[last] ^= 0x40;

        let mut parser = FrameParser::new();
        assert_eq!(run(&mut parser, &encoded), [Err(FrameError::Checksum)]);
        assert_eq!(parser.pending(), 0);
    }

    #[test]
    fn test_oversized_length_resets() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(FRAME_START), Ok(None));
        assert_eq!(
            parser.feed(MAX_PAYLOAD_SIZE as u8 + 1),
            Err(FrameError::Oversized)
        );
        assert_eq!(parser.pending(), 0);

        let good = Frame::new(0x04, &[]).unwrap();
        assert_eq!(run(&mut parser, &good.encode()), [Ok(good)]);
    }

    #[test]
    fn test_back_to_back_frames() {
        let first = Frame::new(0x03, &[1]).unwrap();
        let second = Frame::new(0x07, &[]).unwrap();

        let mut stream = StdVec::new();
        stream.extend_from_slice(&first.encode());
        stream.extend_from_slice(&[0x00, 0x13]);
        stream.extend_from_slice(&second.encode());

        let mut parser = FrameParser::new();
        assert_eq!(run(&mut parser, &stream), [Ok(first), Ok(second)]);
    }

    #[test]
    fn test_payload_limit() {
        assert!(Frame::new(0x05, &[0u8; MAX_PAYLOAD_SIZE]).is_ok());
        assert_eq!(
            Frame::new(0x05, &[0u8; MAX_PAYLOAD_SIZE + 1]),
            Err(FrameError::Oversized)
        );
    }

    proptest! {
        #[test]
        fn parser_finds_frame_after_noise(
            noise in proptest::collection::vec(any::<u8>().prop_filter("no start", |b| *b != FRAME_START), 0..16),
            msg_type in any::<u8>(),
            payload in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE),
        ) {
            let frame = Frame::new(msg_type, &payload).unwrap();

            let mut parser = FrameParser::new();
            prop_assert!(run(&mut parser, &noise).is_empty());
            prop_assert_eq!(run(&mut parser, &frame.encode()), [Ok(frame)]);
        }
    }
}
