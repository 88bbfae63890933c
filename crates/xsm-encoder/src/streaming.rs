use std::io::{self, Write};

use bytes::Bytes;
use xsm_wire::Crc64;
use xsm_wire::StructuredHeaders;
use xsm_wire::message::encode_message_with_crc;

/// Incremental structured-message producer.
///
/// Accepts the payload in chunks of any size, so producers do not need a
/// seekable source. The CRC64 is accumulated as chunks arrive; the message
/// itself is assembled on the first call to
/// [`get_encoded_data`](Self::get_encoded_data) and cached until the next
/// write.
///
/// The output is byte-identical to [`xsm_wire::encode_message`] over the
/// concatenation of every chunk written.
///
/// # Example
///
/// ```rust
/// use xsm_encoder::StreamingEncoder;
///
/// let mut encoder = StreamingEncoder::new(11);
/// encoder.write_data(b"hello ");
/// encoder.write_data(b"world");
///
/// let encoded = encoder.get_encoded_data();
/// assert_eq!(&encoded[..], &xsm_wire::encode_message(b"hello world")[..]);
/// ```
#[derive(Debug)]
pub struct StreamingEncoder {
    /// Anticipated payload length. Reported, never enforced.
    content_length: u64,
    data: Vec<u8>,
    crc: Crc64,
    encoded: Option<Bytes>,
}

impl StreamingEncoder {
    #[must_use]
    pub fn new(content_length: u64) -> Self {
        Self {
            content_length,
            data: Vec::new(),
            crc: Crc64::new(),
            encoded: None,
        }
    }

    /// Append a chunk of payload.
    pub fn write_data(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        self.data.extend_from_slice(chunk);
        self.crc.update(chunk);
        self.encoded = None;
    }

    /// The encoded message over everything written so far.
    ///
    /// Assembled once and cached; later calls without intervening writes
    /// return the same buffer without recomputing anything.
    pub fn get_encoded_data(&mut self) -> Bytes {
        if let Some(encoded) = &self.encoded {
            return encoded.clone();
        }

        let encoded = Bytes::from(encode_message_with_crc(&self.data, self.crc.finalize()));
        tracing::debug!(
            written = self.data.len(),
            encoded_length = encoded.len(),
            "finalized streaming structured message"
        );
        self.encoded = Some(encoded.clone());
        encoded
    }

    /// Metadata to attach to the outgoing transfer, using the anticipated
    /// content length given at construction.
    #[must_use]
    pub fn structured_headers(&self) -> StructuredHeaders {
        StructuredHeaders::new(self.content_length)
    }

    /// Bytes written so far.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.data.len() as u64
    }

    /// Running CRC64 over everything written so far.
    #[must_use]
    pub fn crc64(&self) -> u64 {
        self.crc.finalize()
    }
}

impl Write for StreamingEncoder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_data(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
