#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: full structured message validation on arbitrary bytes.
//
// Catches bugs in:
// - Header validation (length, version, segment count)
// - Segment table walking (numbering, lengths running past the buffer)
// - Checksum comparison
// - Declared vs. consumed length reconciliation
fuzz_target!(|data: &[u8]| {
    if let Ok(view) = xsm_wire::read_message(data) {
        assert_eq!(view.encoded_len(), data.len() as u64);
        let _ = view.to_string();
    }
});
