use std::io::{self, Cursor, Read, Seek, SeekFrom};

use bytes::Bytes;
use xsm_wire::{StructuredHeaders, encode_message};

/// Encodes a seekable source into a structured message and streams it out.
///
/// The message checksum covers the whole payload, so construction reads
/// the source from its start to its end before anything can be produced.
/// After that the reader only hands out bytes from the encoded buffer.
///
/// ```text
///   source ──seek(0)──▶ read_to_end ──▶ encode_message ──▶ read() … EOF
///                  └──── seek(0) (source left rewound)
/// ```
///
/// # Example
///
/// ```rust
/// use std::io::{Cursor, Read};
/// use xsm_encoder::EncoderReader;
///
/// let mut reader = EncoderReader::new(Cursor::new(b"hello".to_vec())).unwrap();
/// assert_eq!(reader.content_length(), 5);
///
/// let mut encoded = Vec::new();
/// reader.read_to_end(&mut encoded).unwrap();
/// assert_eq!(encoded.len() as u64, reader.encoded_length());
/// ```
#[derive(Debug)]
pub struct EncoderReader {
    encoded: Cursor<Bytes>,
    content_length: u64,
}

impl EncoderReader {
    /// Read all of `source` and encode it.
    ///
    /// The source is rewound before reading, so a source left mid-stream
    /// still has its full contents encoded. It is rewound again afterwards.
    ///
    /// # Errors
    ///
    /// Read and seek errors from `source`, unchanged.
    pub fn new<S: Read + Seek>(mut source: S) -> io::Result<Self> {
        source.seek(SeekFrom::Start(0))?;
        let mut payload = Vec::new();
        source.read_to_end(&mut payload)?;
        source.seek(SeekFrom::Start(0))?;

        Ok(Self::from_payload(&payload))
    }

    /// Encode an in-memory payload.
    #[must_use]
    pub fn from_payload(payload: &[u8]) -> Self {
        let encoded = Bytes::from(encode_message(payload));
        let content_length = payload.len() as u64;

        tracing::debug!(
            content_length,
            encoded_length = encoded.len(),
            "encoded structured message"
        );

        Self {
            encoded: Cursor::new(encoded),
            content_length,
        }
    }

    /// Length of the original payload, before encoding.
    #[must_use]
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Length of the full encoded message.
    #[must_use]
    pub fn encoded_length(&self) -> u64 {
        self.encoded.get_ref().len() as u64
    }

    /// Metadata to attach to the outgoing transfer.
    #[must_use]
    pub fn structured_headers(&self) -> StructuredHeaders {
        StructuredHeaders::new(self.content_length)
    }

    /// The complete encoded message, independent of the read position.
    #[must_use]
    pub fn encoded(&self) -> &Bytes {
        self.encoded.get_ref()
    }
}

impl Read for EncoderReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.encoded.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use xsm_wire::{STRUCTURED_BODY_TYPE, decode_message};

    use super::*;

    #[test]
    fn reports_structured_headers() {
        let payload = b"hello world test data!";
        let reader = EncoderReader::new(Cursor::new(payload.to_vec())).unwrap();

        let headers = reader.structured_headers();
        assert_eq!(headers.body_type, STRUCTURED_BODY_TYPE);
        assert_eq!(headers.body_type, "XSM/1.0; properties=crc64");
        assert_eq!(headers.content_length, 22);
        assert_eq!(reader.content_length(), 22);
        assert_eq!(reader.encoded_length(), 22 + 39);
    }

    #[test]
    fn streams_encoded_bytes_then_eof() {
        let payload = b"stream me".to_vec();
        let mut reader = EncoderReader::new(Cursor::new(payload.clone())).unwrap();

        let mut out = Vec::new();
        let mut chunk = [0u8; 7];
        loop {
            let n = reader.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        assert_eq!(out, encode_message(&payload));
        assert_eq!(reader.read(&mut chunk).unwrap(), 0);
        assert_eq!(decode_message(&out).unwrap(), payload);
    }

    #[test]
    fn rewinds_source_before_reading() {
        let payload: Vec<u8> = (0u8..19).collect();
        let mut source = Cursor::new(payload.clone());
        source.seek(SeekFrom::Start(5)).unwrap();

        let reader = EncoderReader::new(&mut source).unwrap();
        assert_eq!(reader.content_length(), 19);
        assert_eq!(decode_message(reader.encoded()).unwrap(), payload);
        assert_eq!(source.position(), 0);
    }

    #[test]
    fn encodes_empty_source() {
        let reader = EncoderReader::new(Cursor::new(Vec::new())).unwrap();
        assert_eq!(reader.content_length(), 0);
        assert_eq!(reader.encoded_length(), 39);
    }

    #[test]
    fn propagates_source_errors() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }

        impl Seek for Broken {
            fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
                Ok(0)
            }
        }

        let err = EncoderReader::new(Broken).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }
}
