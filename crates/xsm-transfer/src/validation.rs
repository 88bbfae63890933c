use std::io::{self, Cursor, Read, Seek, SeekFrom};

use xsm_decoder::DecoderReader;
use xsm_encoder::EncoderReader;
use xsm_wire::{Crc64, STRUCTURED_BODY_TYPE};

use crate::body::RetryableBody;
use crate::config::TransferConfig;
use crate::error::TransferError;
use crate::headers::{
    CONTENT_CRC64, RequestHeaders, ResponseHeaders, STRUCTURED_BODY, STRUCTURED_CONTENT_LENGTH,
};

/// How a transfer proves its bytes arrived intact.
///
/// ```text
/// ┌────────────────────┬────────────────────────┬────────────────────────┐
/// │ Strategy           │ Upload                 │ Download               │
/// ├────────────────────┼────────────────────────┼────────────────────────┤
/// │ PrecomputedCrc64   │ send the given CRC64   │ compare body to it     │
/// │ ComputeCrc64       │ hash body, send CRC64  │ compare to header      │
/// │ StructuredMessage  │ wrap in XSM message    │ decode + validate      │
/// └────────────────────┴────────────────────────┴────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferValidation {
    /// The caller already knows the CRC64 of the body.
    PrecomputedCrc64(u64),
    /// Compute the CRC64 of the whole body before sending.
    ComputeCrc64,
    /// Frame the body as a structured message with per-segment and
    /// whole-message CRC64s.
    StructuredMessage,
}

/// Body handed to the transport for an upload.
#[derive(Debug)]
pub enum UploadBody<R> {
    /// The caller's bytes, unchanged.
    Raw(R),
    /// The caller's bytes framed as a structured message.
    Structured(EncoderReader),
}

impl<R: Read> Read for UploadBody<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Raw(inner) => inner.read(buf),
            Self::Structured(encoder) => encoder.read(buf),
        }
    }
}

/// Body handed back to the caller after a download.
#[derive(Debug)]
pub enum DownloadBody<R> {
    /// No validation was requested; the transport's bytes, unchanged.
    Plain(R),
    /// The whole body matched its CRC64.
    Verified(Cursor<Vec<u8>>),
    /// The payload recovered from a validated structured message.
    Decoded(DecoderReader),
}

impl<R: Read> Read for DownloadBody<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(inner) => inner.read(buf),
            Self::Verified(cursor) => cursor.read(buf),
            Self::Decoded(decoder) => decoder.read(buf),
        }
    }
}

/// An upload ready for the transport: a rewindable body plus the headers
/// that must accompany it.
#[derive(Debug)]
pub struct PreparedUpload<R> {
    pub body: RetryableBody<UploadBody<R>>,
    pub headers: RequestHeaders,
}

impl TransferValidation {
    /// Short name for logs and CLI output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PrecomputedCrc64(_) => "precomputed-crc64",
            Self::ComputeCrc64 => "crc64",
            Self::StructuredMessage => "structured-message",
        }
    }

    /// Prepare `body` for upload under this strategy.
    ///
    /// The body is sized by seeking to its end, and rejected before any
    /// buffering if it exceeds `max_buffered_len`.
    ///
    /// # Errors
    ///
    /// - [`TransferError::BodyTooLarge`] if the body exceeds the limit.
    /// - [`TransferError::Io`] for read or seek failures on `body`.
    pub fn apply_upload<R: Read + Seek>(
        &self,
        mut body: R,
        max_buffered_len: usize,
    ) -> Result<PreparedUpload<R>, TransferError> {
        let len = stream_len(&mut body)?;
        if len > max_buffered_len as u64 {
            return Err(TransferError::BodyTooLarge {
                limit: max_buffered_len,
            });
        }

        let prepared = match *self {
            Self::PrecomputedCrc64(crc) => PreparedUpload {
                body: RetryableBody::new(UploadBody::Raw(body)),
                headers: RequestHeaders {
                    content_length: len,
                    content_crc64: Some(crc),
                    ..RequestHeaders::default()
                },
            },
            Self::ComputeCrc64 => {
                let crc = crc64_of(&mut body)?;
                body.seek(SeekFrom::Start(0))?;
                PreparedUpload {
                    body: RetryableBody::new(UploadBody::Raw(body)),
                    headers: RequestHeaders {
                        content_length: len,
                        content_crc64: Some(crc),
                        ..RequestHeaders::default()
                    },
                }
            }
            Self::StructuredMessage => {
                let encoder = EncoderReader::new(&mut body)?;
                let structured = encoder.structured_headers();
                PreparedUpload {
                    headers: RequestHeaders {
                        content_length: encoder.encoded_length(),
                        content_crc64: None,
                        structured_body_type: Some(structured.body_type),
                        structured_content_length: Some(structured.content_length),
                    },
                    body: RetryableBody::new(UploadBody::Structured(encoder)),
                }
            }
        };

        tracing::debug!(
            strategy = self.name(),
            content_length = prepared.headers.content_length,
            "prepared upload"
        );
        Ok(prepared)
    }

    /// Verify a downloaded `body` under this strategy.
    ///
    /// # Errors
    ///
    /// - [`TransferError::MissingHeader`] if `headers` lacks what the
    ///   strategy compares against.
    /// - [`TransferError::UnexpectedBodyType`] if a structured body is not
    ///   `XSM/1.0; properties=crc64`.
    /// - [`TransferError::Crc64Mismatch`] if a plain CRC64 check fails.
    /// - [`TransferError::Decode`] if the structured message is rejected.
    /// - [`TransferError::BodyTooLarge`] if the body exceeds the limit.
    /// - [`TransferError::Io`] for read failures on `body`.
    pub fn validate_download<R: Read>(
        &self,
        body: R,
        headers: &ResponseHeaders,
        max_buffered_len: usize,
    ) -> Result<RetryableBody<DownloadBody<R>>, TransferError> {
        let verified = match *self {
            Self::PrecomputedCrc64(expected) => {
                verify_crc64(body, expected, max_buffered_len)?
            }
            Self::ComputeCrc64 => {
                let expected = headers.content_crc64.ok_or(TransferError::MissingHeader {
                    name: CONTENT_CRC64,
                })?;
                verify_crc64(body, expected, max_buffered_len)?
            }
            Self::StructuredMessage => {
                let body_type = headers.structured_body_type.as_deref().ok_or(
                    TransferError::MissingHeader {
                        name: STRUCTURED_BODY,
                    },
                )?;
                if body_type != STRUCTURED_BODY_TYPE {
                    return Err(TransferError::UnexpectedBodyType {
                        found: body_type.to_string(),
                    });
                }
                let expected =
                    headers
                        .structured_content_length
                        .ok_or(TransferError::MissingHeader {
                            name: STRUCTURED_CONTENT_LENGTH,
                        })?;

                let encoded = read_bounded(body, max_buffered_len)?;
                DownloadBody::Decoded(DecoderReader::from_encoded(&encoded, expected)?)
            }
        };

        tracing::debug!(strategy = self.name(), "verified download");
        Ok(RetryableBody::new(verified))
    }
}

/// Prepare an upload according to `config`. Without a validation strategy
/// the body is passed through with only its length.
///
/// # Errors
///
/// See [`TransferValidation::apply_upload`].
pub fn prepare_upload<R: Read + Seek>(
    mut body: R,
    config: &TransferConfig,
) -> Result<PreparedUpload<R>, TransferError> {
    match &config.validation {
        Some(validation) => validation.apply_upload(body, config.max_buffered_len),
        None => {
            let len = stream_len(&mut body)?;
            Ok(PreparedUpload {
                body: RetryableBody::new(UploadBody::Raw(body)),
                headers: RequestHeaders {
                    content_length: len,
                    ..RequestHeaders::default()
                },
            })
        }
    }
}

/// Verify a download according to `config`. Without a validation strategy
/// the body is passed through untouched.
///
/// # Errors
///
/// See [`TransferValidation::validate_download`].
pub fn verify_download<R: Read>(
    body: R,
    headers: &ResponseHeaders,
    config: &TransferConfig,
) -> Result<RetryableBody<DownloadBody<R>>, TransferError> {
    match &config.validation {
        Some(validation) => validation.validate_download(body, headers, config.max_buffered_len),
        None => Ok(RetryableBody::new(DownloadBody::Plain(body))),
    }
}

fn verify_crc64<R: Read>(
    body: R,
    expected: u64,
    max_buffered_len: usize,
) -> Result<DownloadBody<R>, TransferError> {
    let bytes = read_bounded(body, max_buffered_len)?;
    let computed = xsm_wire::checksum(&bytes);
    if computed != expected {
        tracing::warn!(expected, computed, "download crc64 mismatch");
        return Err(TransferError::Crc64Mismatch { expected, computed });
    }
    Ok(DownloadBody::Verified(Cursor::new(bytes)))
}

/// Length of a seekable body, leaving it rewound to the start.
fn stream_len<S: Seek>(body: &mut S) -> io::Result<u64> {
    let len = body.seek(SeekFrom::End(0))?;
    body.seek(SeekFrom::Start(0))?;
    Ok(len)
}

/// CRC64 of everything `body` yields.
fn crc64_of<R: Read>(body: &mut R) -> io::Result<u64> {
    let mut crc = Crc64::new();
    io::copy(body, &mut crc)?;
    Ok(crc.finalize())
}

/// Read all of `body`, refusing to buffer more than `limit` bytes.
fn read_bounded<R: Read>(body: R, limit: usize) -> Result<Vec<u8>, TransferError> {
    let mut bytes = Vec::new();
    body.take((limit as u64).saturating_add(1))
        .read_to_end(&mut bytes)?;
    if bytes.len() > limit {
        return Err(TransferError::BodyTooLarge { limit });
    }
    Ok(bytes)
}
