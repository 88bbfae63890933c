use xsm_wire::WireError;

/// Errors that can occur while constructing a [`DecoderReader`](crate::DecoderReader).
///
/// ```text
///   DecodeError
///   ├── Wire(WireError)        ← malformed header, checksum mismatch, bad lengths
///   ├── ContentLengthMismatch  ← decoded size differs from the out-of-band length
///   └── Io(std::io::Error)     ← from the wrapped source, unchanged
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The message itself is malformed or failed checksum validation.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// The message decoded cleanly but holds a different number of bytes
    /// than the transport said it would.
    ///
    /// Checksums only prove the bytes that arrived are intact; a message
    /// cut short at a segment boundary and re-framed would still pass them.
    /// This is the truncation guard.
    #[error(
        "decoded content length mismatch: expected {expected} bytes, got {actual} \
         (payload truncated or padded)"
    )]
    ContentLengthMismatch { expected: u64, actual: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// True when the bytes arrived corrupted, as opposed to malformed or short.
    #[must_use]
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::Wire(WireError::ValidationFailed { .. }))
    }
}
