use xsm_decoder::DecodeError;

/// Errors raised while preparing an upload or verifying a download.
///
/// ```text
/// ┌──────────────────────┬──────────────────────────────────────────────┐
/// │ Variant              │ Cause                                        │
/// ├──────────────────────┼──────────────────────────────────────────────┤
/// │ MissingHeader        │ Response lacks a header the strategy needs   │
/// │ InvalidHeader        │ Header value does not parse                  │
/// │ UnexpectedBodyType   │ Structured body type is not XSM/1.0 + crc64  │
/// │ Crc64Mismatch        │ Whole-body CRC64 differs from the expected   │
/// │ BodyTooLarge         │ Body exceeds the configured buffering limit  │
/// │ Decode               │ Structured message rejected by the decoder   │
/// │ Io                   │ Underlying body read or seek failed          │
/// └──────────────────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("response is missing required header {name}")]
    MissingHeader { name: &'static str },

    #[error("header {name} has invalid value {value:?}")]
    InvalidHeader { name: &'static str, value: String },

    #[error("unexpected structured body type {found:?}")]
    UnexpectedBodyType { found: String },

    #[error(
        "transactional crc64 validation failed: expected {expected:#018x}, computed {computed:#018x}"
    )]
    Crc64Mismatch { expected: u64, computed: u64 },

    #[error("body exceeds the {limit}-byte buffering limit")]
    BodyTooLarge { limit: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
