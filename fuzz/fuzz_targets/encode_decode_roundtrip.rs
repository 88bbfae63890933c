#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use xsm_decoder::DecoderReader;
use xsm_encoder::EncoderReader;

// Fuzz target: EncoderReader -> DecoderReader roundtrip.
//
// Whatever the encoder produces, the decoder must accept and return the
// original payload.
fuzz_target!(|payload: &[u8]| {
    let encoder = EncoderReader::new(Cursor::new(payload)).expect("in-memory source");
    let expected = encoder.structured_headers().content_length;
    let decoder = DecoderReader::new(encoder, expected)
        .unwrap_or_else(|e| panic!("decoder rejected encoder output: {e}"));
    assert_eq!(decoder.decoded(), payload);
});
