//! Round-trip tests: every producer's output decodes back to the payload.
//!
//! Three producers must agree byte-for-byte: [`encode_message`], the
//! seekable [`EncoderReader`], and the chunked [`StreamingEncoder`]. Their
//! output must then survive both the buffer decoder and [`DecoderReader`].

use std::io::{Cursor, Read};

use proptest::prelude::*;
use xsm_decoder::DecoderReader;
use xsm_encoder::{EncoderReader, StreamingEncoder};
use xsm_wire::message::SINGLE_SEGMENT_OVERHEAD;
use xsm_wire::{checksum, decode_message, encode_message, read_message};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Feed `payload` to a [`StreamingEncoder`] split at the given cut points.
fn encode_in_chunks(payload: &[u8], cuts: &[usize]) -> Vec<u8> {
    let mut encoder = StreamingEncoder::new(payload.len() as u64);
    let mut start = 0;
    let mut cuts: Vec<usize> = cuts.iter().map(|c| c % (payload.len() + 1)).collect();
    cuts.sort_unstable();
    for cut in cuts {
        encoder.write_data(&payload[start..cut]);
        start = cut;
    }
    encoder.write_data(&payload[start..]);
    encoder.get_encoded_data().to_vec()
}

fn through_adapters(payload: &[u8]) -> Vec<u8> {
    let encoder = EncoderReader::new(Cursor::new(payload.to_vec())).expect("encode");
    let headers = encoder.structured_headers();
    let mut decoder = DecoderReader::new(encoder, headers.content_length).expect("decode");
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).expect("read");
    out
}

// ── Fixed payloads ────────────────────────────────────────────────────────────

#[test]
fn roundtrip_empty() {
    assert_eq!(decode_message(&encode_message(b"")).unwrap(), b"");
    assert_eq!(through_adapters(b""), b"");
}

#[test]
fn roundtrip_single_byte() {
    assert_eq!(decode_message(&encode_message(&[0xFF])).unwrap(), [0xFF]);
}

#[test]
fn roundtrip_binary_with_every_byte_value() {
    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    assert_eq!(through_adapters(&payload), payload);
}

#[test]
fn roundtrip_one_mebibyte() {
    let payload: Vec<u8> = (0..1024 * 1024u32).map(|i| (i * 31 % 251) as u8).collect();
    let encoded = encode_message(&payload);
    assert_eq!(encoded.len(), payload.len() + SINGLE_SEGMENT_OVERHEAD);
    assert_eq!(decode_message(&encoded).unwrap(), payload);
}

#[test]
fn trailer_matches_segment_crc_for_one_segment() {
    let payload = b"single segment messages repeat the checksum";
    let encoded = encode_message(payload);
    let view = read_message(&encoded).unwrap();
    assert_eq!(view.segments.len(), 1);
    assert_eq!(view.segments[0].crc64, Some(checksum(payload)));
    assert_eq!(view.message_crc64, Some(checksum(payload)));
}

#[test]
fn byte_at_a_time_streaming_matches() {
    let payload = b"one byte per write";
    let mut encoder = StreamingEncoder::new(payload.len() as u64);
    for byte in payload {
        encoder.write_data(std::slice::from_ref(byte));
    }
    assert_eq!(encoder.get_encoded_data().to_vec(), encode_message(payload));
}

// ── Properties ────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn encode_then_decode_is_identity(payload in proptest::collection::vec(any::<u8>(), 0..8192)) {
        let encoded = encode_message(&payload);
        prop_assert_eq!(encoded.len(), payload.len() + SINGLE_SEGMENT_OVERHEAD);
        prop_assert_eq!(decode_message(&encoded).unwrap(), payload);
    }

    #[test]
    fn producers_agree(
        payload in proptest::collection::vec(any::<u8>(), 0..4096),
        cuts in proptest::collection::vec(any::<usize>(), 0..16),
    ) {
        let reference = encode_message(&payload);
        let seekable = EncoderReader::new(Cursor::new(payload.clone())).unwrap();
        prop_assert_eq!(&seekable.encoded()[..], &reference[..]);
        prop_assert_eq!(encode_in_chunks(&payload, &cuts), reference);
    }

    #[test]
    fn adapters_roundtrip(payload in proptest::collection::vec(any::<u8>(), 0..4096)) {
        prop_assert_eq!(through_adapters(&payload), payload);
    }

    #[test]
    fn any_single_bit_flip_is_rejected(
        payload in proptest::collection::vec(any::<u8>(), 1..512),
        bit in any::<usize>(),
    ) {
        let mut encoded = encode_message(&payload);
        let bit = bit % (encoded.len() * 8);
        encoded[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(decode_message(&encoded).is_err(), "bit {} decoded", bit);
    }
}
