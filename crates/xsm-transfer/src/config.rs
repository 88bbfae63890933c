use crate::validation::TransferValidation;

/// Default ceiling on bytes buffered in memory for a single transfer (256 MiB).
pub const DEFAULT_MAX_BUFFERED_LEN: usize = 256 * 1024 * 1024;

/// Configuration for the transfer adapter.
///
/// ```text
/// ┌──────────────────┬──────────────────────────────────────────────────┐
/// │ Field            │ Purpose                                          │
/// ├──────────────────┼──────────────────────────────────────────────────┤
/// │ validation       │ Integrity strategy; `None` sends bytes as-is     │
/// │ max_buffered_len │ Largest body that may be held in memory at once  │
/// └──────────────────┴──────────────────────────────────────────────────┘
/// ```
///
/// Every validating strategy needs the whole body in memory (the checksum
/// covers all of it), so `max_buffered_len` is the only thing standing
/// between a huge body and an allocation failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferConfig {
    pub validation: Option<TransferValidation>,
    pub max_buffered_len: usize,
}

impl TransferConfig {
    #[must_use]
    pub fn with_validation(validation: TransferValidation) -> Self {
        Self {
            validation: Some(validation),
            ..Self::default()
        }
    }
}

impl Default for TransferConfig {
    /// No validation, 256 MiB buffering limit.
    fn default() -> Self {
        Self {
            validation: None,
            max_buffered_len: DEFAULT_MAX_BUFFERED_LEN,
        }
    }
}
