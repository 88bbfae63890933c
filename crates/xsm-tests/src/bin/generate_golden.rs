//! Golden fixture generator for the XSM conformance suite.
//!
//! Writes every fixture under `tests/golden/`. Run it after a wire-format
//! change and commit the regenerated files.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_golden -p xsm-tests
//! ```
//!
//! # Generated fixtures
//!
//! | Directory        | Contents                                          |
//! |------------------|---------------------------------------------------|
//! | hello            | 22-byte payload, single segment                   |
//! | empty            | Zero-length payload, single empty segment         |
//! | multi_segment    | "hello " + "world" split over two segments        |
//! | no_crc64         | Flags 0x0000, framing only; decoders reject it    |
//! | corrupt_trailer  | `hello` with the last trailer bit flipped         |
//! | truncated        | First 40 bytes of `hello`                         |
//!
//! Each directory holds `payload.xsm`. Where the framing is sound,
//! `content.bin` holds the payload its segments carry.

#![allow(clippy::pedantic)]

use std::path::Path;

use xsm_wire::crc64::CRC64_SIZE;
use xsm_wire::header::{HEADER_SIZE, MessageFlags, MessageHeader};
use xsm_wire::segment::{SEGMENT_HEADER_SIZE, SegmentHeader};
use xsm_wire::{Crc64, checksum, encode_message};

const HELLO: &[u8] = b"hello world test data!";

fn main() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let golden_dir = manifest_dir.join("tests/golden");

    generate_valid(&golden_dir, "hello", HELLO);
    generate_valid(&golden_dir, "empty", b"");
    generate_multi_segment(&golden_dir);
    generate_no_crc64(&golden_dir);
    generate_damaged(&golden_dir);

    println!("All golden fixtures written to {}", golden_dir.display());
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create_dir_all");
    }
    std::fs::write(path, data).expect("write_file");
    println!("  wrote {}", path.display());
}

/// Lay out a message segment by segment, bypassing the single-segment
/// encoder.
fn handcraft(flags: MessageFlags, segments: &[(u16, &[u8])]) -> Vec<u8> {
    let per_crc = if flags.has_crc64() { CRC64_SIZE } else { 0 };
    let body: usize = segments
        .iter()
        .map(|(_, data)| SEGMENT_HEADER_SIZE + data.len() + per_crc)
        .sum();
    let total = HEADER_SIZE + body + per_crc;

    let mut out = Vec::with_capacity(total);
    MessageHeader::new(total as u64, flags, segments.len() as u16).append_to(&mut out);
    let mut message_crc = Crc64::new();
    for (number, data) in segments {
        SegmentHeader::new(*number, data.len() as u64).append_to(&mut out);
        out.extend_from_slice(data);
        message_crc.update(data);
        if flags.has_crc64() {
            out.extend_from_slice(&checksum(data).to_le_bytes());
        }
    }
    if flags.has_crc64() {
        out.extend_from_slice(&message_crc.finalize().to_le_bytes());
    }
    out
}

// ── Fixture generators ────────────────────────────────────────────────────────

fn generate_valid(golden: &Path, name: &str, payload: &[u8]) {
    let dir = golden.join(name);
    write_file(&dir.join("payload.xsm"), &encode_message(payload));
    write_file(&dir.join("content.bin"), payload);
}

fn generate_multi_segment(golden: &Path) {
    let dir = golden.join("multi_segment");
    let message = handcraft(MessageFlags::CRC64, &[(1, b"hello "), (2, b"world")]);
    write_file(&dir.join("payload.xsm"), &message);
    write_file(&dir.join("content.bin"), b"hello world");
}

fn generate_no_crc64(golden: &Path) {
    let dir = golden.join("no_crc64");
    let payload = b"unchecked payload";
    let message = handcraft(MessageFlags::NONE, &[(1, payload)]);
    write_file(&dir.join("payload.xsm"), &message);
    write_file(&dir.join("content.bin"), payload);
}

fn generate_damaged(golden: &Path) {
    let mut corrupt = encode_message(HELLO);
    let last = corrupt.len() - 1;
    corrupt[last] ^= 0x01;
    write_file(&golden.join("corrupt_trailer/payload.xsm"), &corrupt);

    let truncated = &encode_message(HELLO)[..40];
    write_file(&golden.join("truncated/payload.xsm"), truncated);
}
