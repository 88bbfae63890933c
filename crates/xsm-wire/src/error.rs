use std::fmt;

/// Errors produced while parsing or validating a structured message.
///
/// ```text
///   WireError
///   ├── MalformedHeader(HeaderFault)  ← short buffer, bad version or flags, bad segment table
///   ├── ValidationFailed              ← segment or message CRC64 mismatch
///   └── MalformedLength(LengthFault)  ← declared lengths disagree with the buffer
/// ```
///
/// None of these are retryable at this layer: re-parsing the same bytes
/// cannot change the outcome.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WireError {
    #[error("malformed header: {0}")]
    MalformedHeader(HeaderFault),

    /// A checksum did not match the data it covers.
    ///
    /// The Display text always contains "validation failed"; downstream
    /// diagnostics match on that phrase.
    #[error(
        "structured message validation failed: {scope} crc64 mismatch \
         (expected {expected:#018x}, computed {computed:#018x})"
    )]
    ValidationFailed {
        scope: ChecksumScope,
        expected: u64,
        computed: u64,
    },

    #[error("malformed message length: {0}")]
    MalformedLength(LengthFault),
}

/// What is wrong with the fixed header or the segment table.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeaderFault {
    #[error("buffer holds {len} bytes, a header needs {needed}")]
    TooShort { len: usize, needed: usize },

    #[error("unsupported message version {version}")]
    UnsupportedVersion { version: u8 },

    #[error("message declares zero segments")]
    NoSegments,

    /// Reserved flag bits are set.
    #[error("unknown message flags {flags:#06x}")]
    UnknownFlags { flags: u16 },

    /// The message does not carry checksums, so it cannot be validated.
    #[error("message does not carry crc64 checksums")]
    MissingCrc64,

    #[error("expected segment {expected}, found segment {found}")]
    SegmentOutOfOrder { expected: u16, found: u16 },
}

/// How the declared lengths fail to reconcile with the buffer.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LengthFault {
    /// The buffer ended inside a field.
    #[error("buffer ends inside {field} at offset {offset}")]
    Truncated { field: &'static str, offset: usize },

    /// A zero-length segment in a message with more than one segment.
    #[error("segment {segment} is empty")]
    EmptySegment { segment: u16 },

    #[error("header declares {declared} bytes but the message spans {consumed}")]
    DeclaredMismatch { declared: u64, consumed: u64 },

    #[error("message spans {consumed} bytes but the buffer holds {buffer}")]
    TrailingBytes { consumed: usize, buffer: usize },
}

/// Which checksum failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChecksumScope {
    /// The per-segment checksum of the given 1-based segment.
    Segment(u16),
    /// The whole-message trailer.
    Message,
}

impl fmt::Display for ChecksumScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Segment(n) => write!(f, "segment {n}"),
            Self::Message => f.write_str("message"),
        }
    }
}
