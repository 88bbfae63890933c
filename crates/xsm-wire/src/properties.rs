/// Body-type tag announcing a version 1 structured message with CRC64s.
pub const STRUCTURED_BODY_TYPE: &str = "XSM/1.0; properties=crc64";

/// Transport metadata that must travel alongside an encoded message.
///
/// The receiver needs both values: the body type tells it to decode and
/// validate, and `content_length` is the original, unencoded payload size
/// it must find after decoding. The encoded size travels separately as the
/// ordinary content length of the transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuredHeaders {
    pub body_type: &'static str,
    pub content_length: u64,
}

impl StructuredHeaders {
    #[must_use]
    pub fn new(content_length: u64) -> Self {
        Self {
            body_type: STRUCTURED_BODY_TYPE,
            content_length,
        }
    }
}
