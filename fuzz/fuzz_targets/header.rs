#![no_main]

use libfuzzer_sys::fuzz_target;
use xsm_wire::header::{MessageHeader, HEADER_SIZE};

// Fuzz target: MessageHeader::read_from with arbitrary bytes.
//
// Any header that parses must re-serialize to the bytes it came from.
fuzz_target!(|data: &[u8]| {
    let Ok(header) = MessageHeader::read_from(data) else {
        return;
    };
    let mut out = Vec::new();
    header.append_to(&mut out);
    assert_eq!(&out[..], &data[..HEADER_SIZE]);
});
