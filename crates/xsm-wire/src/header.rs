use crate::error::{HeaderFault, WireError};

/// Total header size in bytes (fixed).
pub const HEADER_SIZE: usize = 13;

/// The only message version this codec reads or writes.
pub const MESSAGE_VERSION: u8 = 1;

/// Message flags bitfield.
///
/// Bit layout:
///   bit 0 = CRC64 (segment checksums and a message trailer are present)
///   bits 1-15 = reserved
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MessageFlags(u16);

impl MessageFlags {
    pub const NONE: Self = Self(0);

    /// Every segment carries a CRC64 and the message ends with a CRC64 trailer.
    pub const CRC64: Self = Self(0b0000_0000_0000_0001);

    /// Every bit this version defines.
    pub const KNOWN: Self = Self::CRC64;

    #[must_use]
    pub fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn has_crc64(self) -> bool {
        self.0 & Self::CRC64.0 != 0
    }

    /// Reserved bits that are set.
    #[must_use]
    pub fn unknown_bits(self) -> u16 {
        self.0 & !Self::KNOWN.0
    }
}

/// Structured message header, the first 13 bytes of every message.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                              │
/// ├────────┼─────────┼──────────────────────────────────────────┤
/// │ 0x00   │ 1 byte  │ Message version (1)                      │
/// │ 0x01   │ 8 bytes │ Message length, whole message, LE        │
/// │ 0x09   │ 2 bytes │ Flags, LE                                │
/// │ 0x0B   │ 2 bytes │ Number of segments, LE                   │
/// └────────┴─────────┴──────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageHeader {
    pub version: u8,
    pub message_length: u64,
    pub flags: MessageFlags,
    pub num_segments: u16,
}

impl MessageHeader {
    /// Create a header for the current version.
    #[must_use]
    pub fn new(message_length: u64, flags: MessageFlags, num_segments: u16) -> Self {
        Self {
            version: MESSAGE_VERSION,
            message_length,
            flags,
            num_segments,
        }
    }

    /// Write the 13-byte header into the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`LengthFault::Truncated`](crate::LengthFault::Truncated)
    /// if `buf` is shorter than [`HEADER_SIZE`].
    pub fn write_to(&self, buf: &mut [u8]) -> Result<(), WireError> {
        if buf.len() < HEADER_SIZE {
            return Err(WireError::MalformedLength(crate::LengthFault::Truncated {
                field: "header",
                offset: buf.len(),
            }));
        }

        buf[0] = self.version;
        buf[1..9].copy_from_slice(&self.message_length.to_le_bytes());
        buf[9..11].copy_from_slice(&self.flags.raw().to_le_bytes());
        buf[11..13].copy_from_slice(&self.num_segments.to_le_bytes());

        Ok(())
    }

    /// Append the 13-byte header to `out`.
    pub fn append_to(&self, out: &mut Vec<u8>) {
        out.push(self.version);
        out.extend_from_slice(&self.message_length.to_le_bytes());
        out.extend_from_slice(&self.flags.raw().to_le_bytes());
        out.extend_from_slice(&self.num_segments.to_le_bytes());
    }

    /// Parse a header from the first 13 bytes of `buf`.
    ///
    /// # Errors
    ///
    /// - [`HeaderFault::TooShort`] if the buffer is shorter than 13 bytes.
    /// - [`HeaderFault::UnsupportedVersion`] if the version is not 1.
    /// - [`HeaderFault::UnknownFlags`] if a reserved flag bit is set.
    /// - [`HeaderFault::NoSegments`] if the segment count is zero.
    pub fn read_from(buf: &[u8]) -> Result<Self, WireError> {
        if buf.len() < HEADER_SIZE {
            return Err(WireError::MalformedHeader(HeaderFault::TooShort {
                len: buf.len(),
                needed: HEADER_SIZE,
            }));
        }

        let version = buf[0];
        if version != MESSAGE_VERSION {
            return Err(WireError::MalformedHeader(HeaderFault::UnsupportedVersion {
                version,
            }));
        }

        let message_length = u64::from_le_bytes([
            buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7], buf[8],
        ]);
        let flags = MessageFlags::from_raw(u16::from_le_bytes([buf[9], buf[10]]));
        let num_segments = u16::from_le_bytes([buf[11], buf[12]]);

        if flags.unknown_bits() != 0 {
            return Err(WireError::MalformedHeader(HeaderFault::UnknownFlags {
                flags: flags.raw(),
            }));
        }
        if num_segments == 0 {
            return Err(WireError::MalformedHeader(HeaderFault::NoSegments));
        }

        Ok(Self {
            version,
            message_length,
            flags,
            num_segments,
        })
    }
}
