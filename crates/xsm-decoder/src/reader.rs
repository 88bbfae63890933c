use std::io::{self, Cursor, Read};

use tokio::io::AsyncRead;
use xsm_wire::decode_message;

use crate::error::DecodeError;

/// Decodes and validates a structured message, then streams the payload.
///
/// Construction reads the source to completion, validates every checksum
/// and length, and checks the decoded size against the content length the
/// transport reported out-of-band. Validation is unconditional: a
/// `DecoderReader` that exists has been validated.
///
/// ```text
///   source ──read_to_end──▶ decode_message ──▶ len == expected? ──▶ read() … EOF
/// ```
///
/// # Example
///
/// ```rust
/// use std::io::{Cursor, Read};
/// use xsm_decoder::DecoderReader;
///
/// let encoded = xsm_wire::encode_message(b"hello");
/// let mut reader = DecoderReader::new(Cursor::new(encoded), 5).unwrap();
///
/// let mut payload = Vec::new();
/// reader.read_to_end(&mut payload).unwrap();
/// assert_eq!(payload, b"hello");
/// ```
#[derive(Debug)]
pub struct DecoderReader {
    decoded: Cursor<Vec<u8>>,
    original_length: u64,
}

impl DecoderReader {
    /// Read all of `source` and decode it.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Io`] if reading `source` fails.
    /// - [`DecodeError::Wire`] if the message is malformed or a checksum
    ///   does not match.
    /// - [`DecodeError::ContentLengthMismatch`] if the decoded payload is
    ///   not exactly `expected_content_length` bytes.
    pub fn new<R: Read>(mut source: R, expected_content_length: u64) -> Result<Self, DecodeError> {
        let mut encoded = Vec::new();
        source.read_to_end(&mut encoded)?;
        Self::from_encoded(&encoded, expected_content_length)
    }

    /// Read all of an async `source` and decode it.
    ///
    /// Behaves exactly like [`new`](Self::new) once the bytes are in memory.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub async fn from_async_reader<R: AsyncRead + Unpin>(
        mut source: R,
        expected_content_length: u64,
    ) -> Result<Self, DecodeError> {
        use tokio::io::AsyncReadExt;

        let mut encoded = Vec::new();
        source.read_to_end(&mut encoded).await?;
        Self::from_encoded(&encoded, expected_content_length)
    }

    /// Decode a message that is already in memory.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Wire`] and [`DecodeError::ContentLengthMismatch`] as
    /// for [`new`](Self::new).
    pub fn from_encoded(encoded: &[u8], expected_content_length: u64) -> Result<Self, DecodeError> {
        let decoded = decode_message(encoded).inspect_err(|e| {
            tracing::warn!(encoded_length = encoded.len(), error = %e, "structured message rejected");
        })?;

        let actual = decoded.len() as u64;
        if actual != expected_content_length {
            tracing::warn!(
                expected = expected_content_length,
                actual,
                "structured message content length mismatch"
            );
            return Err(DecodeError::ContentLengthMismatch {
                expected: expected_content_length,
                actual,
            });
        }

        tracing::debug!(
            content_length = actual,
            encoded_length = encoded.len(),
            "decoded structured message"
        );

        Ok(Self {
            decoded: Cursor::new(decoded),
            original_length: encoded.len() as u64,
        })
    }

    /// Length of the decoded payload.
    #[must_use]
    pub fn content_length(&self) -> u64 {
        self.decoded.get_ref().len() as u64
    }

    /// Length of the encoded message that was consumed.
    #[must_use]
    pub fn original_length(&self) -> u64 {
        self.original_length
    }

    /// Always true: construction fails unless every check passed.
    #[must_use]
    pub fn is_validated(&self) -> bool {
        true
    }

    /// The decoded payload, independent of the read position.
    #[must_use]
    pub fn decoded(&self) -> &[u8] {
        self.decoded.get_ref()
    }

    /// Take ownership of the decoded payload.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.decoded.into_inner()
    }
}

impl Read for DecoderReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(&mut self.decoded, buf)
    }
}
