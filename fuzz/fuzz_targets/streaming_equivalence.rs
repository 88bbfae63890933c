#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use xsm_encoder::StreamingEncoder;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    chunks: Vec<Vec<u8>>,
    finalize_midway: bool,
}

// Fuzz target: StreamingEncoder over arbitrary chunk boundaries.
//
// Output must equal one-shot encoding of the concatenated chunks, even
// when the message is finalized halfway through and written to again.
fuzz_target!(|input: FuzzInput| {
    let payload: Vec<u8> = input.chunks.concat();
    let mut encoder = StreamingEncoder::new(payload.len() as u64);

    let half = input.chunks.len() / 2;
    for (i, chunk) in input.chunks.iter().enumerate() {
        if input.finalize_midway && i == half {
            let _ = encoder.get_encoded_data();
        }
        encoder.write_data(chunk);
    }

    let encoded = encoder.get_encoded_data();
    assert_eq!(&encoded[..], &xsm_wire::encode_message(&payload)[..]);
});
