use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::TransferError;

pub const CONTENT_LENGTH: &str = "Content-Length";
pub const STRUCTURED_BODY: &str = "x-ms-structured-body";
pub const STRUCTURED_CONTENT_LENGTH: &str = "x-ms-structured-content-length";
pub const CONTENT_CRC64: &str = "x-ms-content-crc64";

/// Render a CRC64 the way the transport carries it: base64 of the 8
/// little-endian bytes.
#[must_use]
pub fn encode_crc64(crc: u64) -> String {
    STANDARD.encode(crc.to_le_bytes())
}

/// Parse a transport CRC64 header value.
///
/// Returns `None` unless the value is base64 of exactly 8 bytes.
#[must_use]
pub fn decode_crc64(value: &str) -> Option<u64> {
    let bytes = STANDARD.decode(value.trim()).ok()?;
    let raw: [u8; 8] = bytes.try_into().ok()?;
    Some(u64::from_le_bytes(raw))
}

/// Headers a validation strategy attaches to an outgoing request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    /// Bytes actually sent: the encoded length for structured messages.
    pub content_length: u64,
    pub content_crc64: Option<u64>,
    pub structured_body_type: Option<&'static str>,
    /// Original payload length inside a structured message.
    pub structured_content_length: Option<u64>,
}

impl RequestHeaders {
    /// Header name/value pairs, in a stable order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![(CONTENT_LENGTH, self.content_length.to_string())];
        if let Some(crc) = self.content_crc64 {
            pairs.push((CONTENT_CRC64, encode_crc64(crc)));
        }
        if let Some(body_type) = self.structured_body_type {
            pairs.push((STRUCTURED_BODY, body_type.to_string()));
        }
        if let Some(len) = self.structured_content_length {
            pairs.push((STRUCTURED_CONTENT_LENGTH, len.to_string()));
        }
        pairs
    }
}

/// Validation-relevant headers from an incoming response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    pub content_length: Option<u64>,
    pub content_crc64: Option<u64>,
    pub structured_body_type: Option<String>,
    pub structured_content_length: Option<u64>,
}

impl ResponseHeaders {
    /// Collect the headers this crate understands from raw name/value
    /// pairs. Names match case-insensitively; unknown names are ignored.
    ///
    /// # Errors
    ///
    /// [`TransferError::InvalidHeader`] if a known header has a value that
    /// does not parse.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, TransferError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut headers = Self::default();
        for (name, value) in pairs {
            if name.eq_ignore_ascii_case(CONTENT_LENGTH) {
                headers.content_length = Some(parse_length(CONTENT_LENGTH, value)?);
            } else if name.eq_ignore_ascii_case(CONTENT_CRC64) {
                let crc = decode_crc64(value).ok_or_else(|| TransferError::InvalidHeader {
                    name: CONTENT_CRC64,
                    value: value.to_string(),
                })?;
                headers.content_crc64 = Some(crc);
            } else if name.eq_ignore_ascii_case(STRUCTURED_BODY) {
                headers.structured_body_type = Some(value.trim().to_string());
            } else if name.eq_ignore_ascii_case(STRUCTURED_CONTENT_LENGTH) {
                headers.structured_content_length =
                    Some(parse_length(STRUCTURED_CONTENT_LENGTH, value)?);
            }
        }
        Ok(headers)
    }
}

fn parse_length(name: &'static str, value: &str) -> Result<u64, TransferError> {
    value
        .trim()
        .parse()
        .map_err(|_| TransferError::InvalidHeader {
            name,
            value: value.to_string(),
        })
}
