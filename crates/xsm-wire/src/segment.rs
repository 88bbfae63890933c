use crate::error::{LengthFault, WireError};

/// Size of a segment header (number + data length), in bytes.
pub const SEGMENT_HEADER_SIZE: usize = 10;

/// The fixed prefix of every segment.
///
/// ```text
/// ┌──────────────────┬─────────┬────────────────────────────────┐
/// │ Field            │ Size    │ Description                    │
/// ├──────────────────┼─────────┼────────────────────────────────┤
/// │ segment_number   │ 2 bytes │ 1-based ordinal, LE            │
/// │ data_length      │ 8 bytes │ Length of the data slice, LE   │
/// │ data             │ N bytes │ Raw payload slice              │
/// │ segment_crc64    │ 8 bytes │ Present when flags has CRC64   │
/// └──────────────────┴─────────┴────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentHeader {
    pub number: u16,
    pub data_length: u64,
}

impl SegmentHeader {
    #[must_use]
    pub fn new(number: u16, data_length: u64) -> Self {
        Self {
            number,
            data_length,
        }
    }

    pub fn append_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.number.to_le_bytes());
        out.extend_from_slice(&self.data_length.to_le_bytes());
    }

    /// Parse a segment header from the start of `buf`.
    ///
    /// `offset` is the position of `buf` within the whole message and is
    /// only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`LengthFault::Truncated`] if fewer than
    /// [`SEGMENT_HEADER_SIZE`] bytes remain.
    pub fn read_from(buf: &[u8], offset: usize) -> Result<Self, WireError> {
        if buf.len() < SEGMENT_HEADER_SIZE {
            return Err(WireError::MalformedLength(LengthFault::Truncated {
                field: "segment header",
                offset: offset + buf.len(),
            }));
        }

        let number = u16::from_le_bytes([buf[0], buf[1]]);
        let data_length = u64::from_le_bytes([
            buf[2], buf[3], buf[4], buf[5], buf[6], buf[7], buf[8], buf[9],
        ]);

        Ok(Self {
            number,
            data_length,
        })
    }
}
