use std::fmt;

use crate::crc64::{CRC64_SIZE, Crc64, checksum};
use crate::error::{ChecksumScope, HeaderFault, LengthFault, WireError};
use crate::header::{HEADER_SIZE, MessageFlags, MessageHeader};
use crate::segment::{SEGMENT_HEADER_SIZE, SegmentHeader};

/// Bytes a single-segment CRC64 message adds on top of its payload:
/// header, segment header, segment CRC64 and message trailer.
pub const SINGLE_SEGMENT_OVERHEAD: usize =
    HEADER_SIZE + SEGMENT_HEADER_SIZE + CRC64_SIZE + CRC64_SIZE;

/// Total encoded length of a single-segment CRC64 message carrying
/// `payload_len` bytes.
#[must_use]
pub fn message_length(payload_len: u64) -> u64 {
    SINGLE_SEGMENT_OVERHEAD as u64 + payload_len
}

/// Encode `payload` as a single-segment structured message.
///
/// ```text
/// ┌──────────────┬──────────────────────────────────────────────┐
/// │ [13 bytes]   │ Header (version 1, length, CRC64 flag, 1 seg)│
/// │ [10 bytes]   │ Segment header (number 1, data length)       │
/// │ [N bytes]    │ Payload                                      │
/// │ [8 bytes]    │ Segment CRC64                                │
/// │ [8 bytes]    │ Message CRC64 trailer                        │
/// └──────────────┴──────────────────────────────────────────────┘
/// ```
///
/// With a single segment both checksums cover the same bytes, so they are
/// always equal.
///
/// ```rust
/// use xsm_wire::{decode_message, encode_message};
///
/// let encoded = encode_message(b"hello");
/// assert_eq!(encoded.len(), 5 + 39);
/// assert_eq!(decode_message(&encoded).unwrap(), b"hello");
/// ```
#[must_use]
pub fn encode_message(payload: &[u8]) -> Vec<u8> {
    encode_message_with_crc(payload, checksum(payload))
}

/// Encode `payload` using a CRC64 the caller has already computed.
///
/// This is the layout writer shared by [`encode_message`] and incremental
/// producers that accumulate the checksum while the payload arrives. `crc`
/// must be `checksum(payload)`; passing anything else yields a message that
/// fails validation on decode.
#[must_use]
pub fn encode_message_with_crc(payload: &[u8], crc: u64) -> Vec<u8> {
    let payload_len = payload.len() as u64;
    let total = message_length(payload_len);

    let mut out = Vec::with_capacity(payload.len() + SINGLE_SEGMENT_OVERHEAD);
    MessageHeader::new(total, MessageFlags::CRC64, 1).append_to(&mut out);
    SegmentHeader::new(1, payload_len).append_to(&mut out);
    out.extend_from_slice(payload);
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());

    debug_assert_eq!(out.len() as u64, total);
    out
}

/// One validated segment, borrowed from the message buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentView<'a> {
    pub number: u16,
    /// Offset of the segment header within the message.
    pub offset: usize,
    pub data: &'a [u8],
    pub crc64: Option<u64>,
}

impl SegmentView<'_> {
    /// Bytes this segment occupies on the wire, checksum included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let crc = if self.crc64.is_some() { CRC64_SIZE } else { 0 };
        SEGMENT_HEADER_SIZE + self.data.len() + crc
    }
}

/// A fully validated structured message, borrowed from its buffer.
///
/// Produced by [`read_message`]. Every checksum and length has already
/// been verified, so the view can be trusted as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageView<'a> {
    pub header: MessageHeader,
    pub segments: Vec<SegmentView<'a>>,
    pub message_crc64: Option<u64>,
}

impl MessageView<'_> {
    /// Total decoded payload length across all segments.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.segments.iter().map(|s| s.data.len()).sum()
    }

    /// Length of the encoded message.
    #[must_use]
    pub fn encoded_len(&self) -> u64 {
        self.header.message_length
    }

    /// Concatenate the segment data in segment order.
    #[must_use]
    pub fn decoded(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload_len());
        for segment in &self.segments {
            out.extend_from_slice(segment.data);
        }
        out
    }
}

impl fmt::Display for MessageView<'_> {
    /// Render the message layout, one line per wire region.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "XSM v{} message: {} bytes, flags {:#06x}, {} segment{}",
            self.header.version,
            self.header.message_length,
            self.header.flags.raw(),
            self.header.num_segments,
            if self.header.num_segments == 1 { "" } else { "s" }
        )?;
        writeln!(f, "  {:#06x}  header     {HEADER_SIZE:>10} bytes", 0)?;

        let mut end = HEADER_SIZE;
        for segment in &self.segments {
            write!(
                f,
                "  {:#06x}  segment {:<2} {:>10} bytes",
                segment.offset,
                segment.number,
                segment.data.len()
            )?;
            if let Some(crc) = segment.crc64 {
                write!(f, "  crc64 {crc:#018x}")?;
            }
            writeln!(f)?;
            end = segment.offset + segment.encoded_len();
        }

        if let Some(crc) = self.message_crc64 {
            writeln!(
                f,
                "  {end:#06x}  trailer    {CRC64_SIZE:>10} bytes  crc64 {crc:#018x}"
            )?;
        }
        Ok(())
    }
}

/// Parse and fully validate a structured message.
///
/// Validation proceeds in message order:
///
///   1. **Header**: at least 13 bytes, version 1, no reserved flag bits,
///      non-zero segment count.
///   2. **Segments**: numbers contiguous from 1, each data slice inside the
///      buffer, each segment CRC64 equal to the checksum of its data.
///   3. **Trailer**: the message CRC64 equals the checksum of all segment
///      data concatenated.
///   4. **Length**: bytes consumed equal the declared message length and
///      the buffer length.
///
/// Checksums are only present (and only checked) when the header's CRC64
/// flag is set. Decoders use [`validate_message`], which also requires the
/// flag.
///
/// # Errors
///
/// - [`WireError::MalformedHeader`] for a short buffer, unsupported
///   version, reserved flag bits, zero segments, or out-of-order segment
///   numbers.
/// - [`WireError::ValidationFailed`] for any checksum mismatch.
/// - [`WireError::MalformedLength`] when a field runs past the end of the
///   buffer, an empty segment appears in a multi-segment message, or the
///   consumed length disagrees with the header or the buffer.
pub fn read_message(buf: &[u8]) -> Result<MessageView<'_>, WireError> {
    let header = MessageHeader::read_from(buf)?;
    let has_crc64 = header.flags.has_crc64();

    let mut cursor = HEADER_SIZE;
    let mut running = Crc64::new();
    let mut segments = Vec::with_capacity(usize::from(header.num_segments).min(16));

    for expected in 1..=header.num_segments {
        let offset = cursor;
        let segment = SegmentHeader::read_from(&buf[cursor..], cursor)?;
        if segment.number != expected {
            return Err(WireError::MalformedHeader(HeaderFault::SegmentOutOfOrder {
                expected,
                found: segment.number,
            }));
        }
        if segment.data_length == 0 && header.num_segments > 1 {
            return Err(WireError::MalformedLength(LengthFault::EmptySegment {
                segment: segment.number,
            }));
        }
        cursor += SEGMENT_HEADER_SIZE;

        let data = slice_at(buf, cursor, segment.data_length, "segment data")?;
        cursor += data.len();
        running.update(data);

        let crc64 = if has_crc64 {
            let stored = read_u64(buf, cursor, "segment crc64")?;
            cursor += CRC64_SIZE;
            let computed = checksum(data);
            if stored != computed {
                return Err(WireError::ValidationFailed {
                    scope: ChecksumScope::Segment(segment.number),
                    expected: stored,
                    computed,
                });
            }
            Some(stored)
        } else {
            None
        };

        segments.push(SegmentView {
            number: segment.number,
            offset,
            data,
            crc64,
        });
    }

    let message_crc64 = if has_crc64 {
        let stored = read_u64(buf, cursor, "message crc64")?;
        cursor += CRC64_SIZE;
        let computed = running.finalize();
        if stored != computed {
            return Err(WireError::ValidationFailed {
                scope: ChecksumScope::Message,
                expected: stored,
                computed,
            });
        }
        Some(stored)
    } else {
        None
    };

    if header.message_length != cursor as u64 {
        return Err(WireError::MalformedLength(LengthFault::DeclaredMismatch {
            declared: header.message_length,
            consumed: cursor as u64,
        }));
    }
    if cursor != buf.len() {
        return Err(WireError::MalformedLength(LengthFault::TrailingBytes {
            consumed: cursor,
            buffer: buf.len(),
        }));
    }

    Ok(MessageView {
        header,
        segments,
        message_crc64,
    })
}

/// Parse a structured message and require that it carries checksums.
///
/// [`read_message`] accepts a message with the CRC64 flag cleared, since
/// its framing is still well defined. A receiver that was promised a
/// checksummed body must not accept one, so this is the entry point for
/// every decode.
///
/// # Errors
///
/// - [`HeaderFault::MissingCrc64`] if the CRC64 flag is cleared.
/// - Every error from [`read_message`].
pub fn validate_message(buf: &[u8]) -> Result<MessageView<'_>, WireError> {
    let view = read_message(buf)?;
    if !view.header.flags.has_crc64() {
        return Err(WireError::MalformedHeader(HeaderFault::MissingCrc64));
    }
    Ok(view)
}

/// Decode a structured message back into its payload.
///
/// # Errors
///
/// Every error from [`validate_message`].
pub fn decode_message(buf: &[u8]) -> Result<Vec<u8>, WireError> {
    validate_message(buf).map(|view| view.decoded())
}

/// Borrow `len` bytes at `offset`, or report where the buffer ran out.
fn slice_at<'a>(
    buf: &'a [u8],
    offset: usize,
    len: u64,
    field: &'static str,
) -> Result<&'a [u8], WireError> {
    usize::try_from(len)
        .ok()
        .and_then(|len| offset.checked_add(len))
        .filter(|&end| end <= buf.len())
        .map(|end| &buf[offset..end])
        .ok_or(WireError::MalformedLength(LengthFault::Truncated {
            field,
            offset: buf.len(),
        }))
}

fn read_u64(buf: &[u8], offset: usize, field: &'static str) -> Result<u64, WireError> {
    let bytes = slice_at(buf, offset, CRC64_SIZE as u64, field)?;
    let mut raw = [0u8; CRC64_SIZE];
    raw.copy_from_slice(bytes);
    Ok(u64::from_le_bytes(raw))
}
