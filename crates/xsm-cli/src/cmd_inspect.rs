/// Implementation of `xsm inspect`.
///
/// Parses and validates a structured message, then prints its layout.
///
/// # Output format
///
/// ```text
/// XSM v1 message: 61 bytes, flags 0x0001, 1 segment
///   0x0000  header             13 bytes
///   0x000d  segment 1          22 bytes  crc64 0x875168211cc51b01
///   0x0035  trailer             8 bytes  crc64 0x875168211cc51b01
/// ```
///
/// With `--json` the same information is emitted as a JSON object.
use std::fs;

use anyhow::{Context, Result};
use serde::Serialize;
use xsm_wire::MessageView;

use crate::InspectArgs;

/// Bytes of segment data shown by `--show-hex`.
const HEX_PREVIEW_LEN: usize = 64;

#[derive(Serialize)]
struct MessageReport {
    version: u8,
    message_length: u64,
    flags: u16,
    num_segments: u16,
    payload_length: usize,
    segments: Vec<SegmentReport>,
    message_crc64: Option<String>,
}

#[derive(Serialize)]
struct SegmentReport {
    number: u16,
    offset: usize,
    data_length: usize,
    crc64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_hex: Option<String>,
}

impl MessageReport {
    fn new(view: &MessageView<'_>, show_hex: bool) -> Self {
        let segments = view
            .segments
            .iter()
            .map(|segment| SegmentReport {
                number: segment.number,
                offset: segment.offset,
                data_length: segment.data.len(),
                crc64: segment.crc64.map(|crc| format!("{crc:#018x}")),
                data_hex: show_hex.then(|| hex::encode(preview(segment.data))),
            })
            .collect();

        Self {
            version: view.header.version,
            message_length: view.header.message_length,
            flags: view.header.flags.raw(),
            num_segments: view.header.num_segments,
            payload_length: view.payload_len(),
            segments,
            message_crc64: view.message_crc64.map(|crc| format!("{crc:#018x}")),
        }
    }
}

fn preview(data: &[u8]) -> &[u8] {
    &data[..data.len().min(HEX_PREVIEW_LEN)]
}

/// Run the `xsm inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the message fails
/// structural or checksum validation.
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes =
        fs::read(&args.input).with_context(|| format!("cannot read {}", args.input.display()))?;

    let view = xsm_wire::read_message(&bytes)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    if args.json {
        let report = MessageReport::new(&view, args.show_hex);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{view}");
    if args.show_hex {
        for segment in &view.segments {
            println!("segment {} data:", segment.number);
            for (i, chunk) in preview(segment.data).chunks(16).enumerate() {
                println!("  {:04x}: {}", i * 16, hex::encode(chunk));
            }
            if segment.data.len() > HEX_PREVIEW_LEN {
                println!("  … {} more bytes", segment.data.len() - HEX_PREVIEW_LEN);
            }
        }
    }
    Ok(())
}
