/// Implementation of `xsm validate`.
///
/// Runs the full decode path and reports either success checkmarks (`✓`)
/// or a single diagnostic line (`✗`). Exits 1 on failure.
///
/// # Success output
///
/// ```text
/// ✓ Header: valid (XSM v1, 1 segment)
/// ✓ Checksums: segment and message crc64 match
/// ✓ Length: 61 bytes encoded, 22 bytes payload
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Corrupt: structured message validation failed: message crc64 mismatch (…)
/// ```
use std::fs;

use anyhow::{Context, Result, anyhow};
use xsm_decoder::DecodeError;
use xsm_wire::{MessageView, WireError, validate_message};

use crate::ValidateArgs;

/// Run the `xsm validate` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails any check.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let bytes =
        fs::read(&args.input).with_context(|| format!("cannot read {}", args.input.display()))?;

    match check(&bytes, args.content_length) {
        Ok(view) => {
            let segments = view.header.num_segments;
            println!(
                "✓ Header: valid (XSM v{}, {} segment{})",
                view.header.version,
                segments,
                if segments == 1 { "" } else { "s" }
            );
            println!("✓ Checksums: segment and message crc64 match");
            println!(
                "✓ Length: {} bytes encoded, {} bytes payload",
                view.encoded_len(),
                view.payload_len()
            );
            Ok(())
        }
        Err(e) => {
            println!("✗ {}", diagnostic(&e));
            Err(anyhow!("validation failed"))
        }
    }
}

/// Validate every checksum and, when given, the expected payload length.
fn check(bytes: &[u8], content_length: Option<u64>) -> Result<MessageView<'_>, DecodeError> {
    let view = validate_message(bytes)?;
    let actual = view.payload_len() as u64;
    match content_length {
        Some(expected) if expected != actual => {
            Err(DecodeError::ContentLengthMismatch { expected, actual })
        }
        _ => Ok(view),
    }
}

/// Prefix each failure with the class of problem it indicates.
///
/// ```text
/// ┌──────────────────────────┬──────────────┐
/// │ Error                    │ Prefix       │
/// ├──────────────────────────┼──────────────┤
/// │ ValidationFailed         │ Corrupt      │
/// │ MalformedHeader          │ Malformed    │
/// │ MalformedLength          │ Truncated    │
/// │ ContentLengthMismatch    │ Truncated    │
/// │ Io                       │ Error        │
/// └──────────────────────────┴──────────────┘
/// ```
fn diagnostic(e: &DecodeError) -> String {
    let class = match e {
        DecodeError::Wire(WireError::ValidationFailed { .. }) => "Corrupt",
        DecodeError::Wire(WireError::MalformedHeader(_)) => "Malformed",
        DecodeError::Wire(WireError::MalformedLength(_))
        | DecodeError::ContentLengthMismatch { .. } => "Truncated",
        DecodeError::Io(_) => "Error",
    };
    format!("{class}: {e}")
}

#[cfg(test)]
mod tests {
    use xsm_wire::encode_message;
    use xsm_wire::header::{HEADER_SIZE, MessageFlags, MessageHeader};
    use xsm_wire::segment::{SEGMENT_HEADER_SIZE, SegmentHeader};

    use super::*;

    #[test]
    fn valid_message_passes() {
        let encoded = encode_message(b"payload");
        assert_eq!(check(&encoded, Some(7)).unwrap().payload_len(), 7);
        assert!(check(&encoded, None).is_ok());
    }

    #[test]
    fn wrong_content_length_is_truncation() {
        let encoded = encode_message(b"payload");
        let err = check(&encoded, Some(8)).unwrap_err();
        assert!(diagnostic(&err).starts_with("Truncated: "));
    }

    #[test]
    fn corrupt_trailer_is_corrupt() {
        let mut encoded = encode_message(b"payload");
        let last = encoded.len() - 1;
        encoded[last] ^= 0x80;
        let err = check(&encoded, None).unwrap_err();
        assert!(diagnostic(&err).starts_with("Corrupt: "));
    }

    #[test]
    fn message_without_checksums_fails() {
        let payload = b"unchecked";
        let total = HEADER_SIZE + SEGMENT_HEADER_SIZE + payload.len();
        let mut encoded = Vec::new();
        MessageHeader::new(total as u64, MessageFlags::NONE, 1).append_to(&mut encoded);
        SegmentHeader::new(1, payload.len() as u64).append_to(&mut encoded);
        encoded.extend_from_slice(payload);

        let err = check(&encoded, None).unwrap_err();
        assert_eq!(
            diagnostic(&err),
            "Malformed: malformed header: message does not carry crc64 checksums"
        );
    }
}
