//! End-to-end transfer tests: upload preparation on one side, header
//! serialization across a simulated wire, download verification on the
//! other.

use std::io::{Cursor, Read, Seek, SeekFrom};

use xsm_decoder::{DecodeError, DecoderReader};
use xsm_transfer::headers::{CONTENT_CRC64, encode_crc64};
use xsm_transfer::{
    ResponseHeaders, TransferConfig, TransferError, TransferValidation, prepare_upload,
    verify_download,
};
use xsm_wire::{WireError, checksum};

const PAYLOAD: &[u8] = b"hello world test data!";

/// What the server sees: the body bytes and the headers as strings.
struct Wire {
    body: Vec<u8>,
    headers: Vec<(&'static str, String)>,
}

fn upload(config: &TransferConfig) -> Wire {
    let mut prepared = prepare_upload(Cursor::new(PAYLOAD.to_vec()), config).unwrap();
    let mut body = Vec::new();
    prepared.body.read_to_end(&mut body).unwrap();
    Wire {
        body,
        headers: prepared.headers.to_pairs(),
    }
}

fn download(wire: &Wire, config: &TransferConfig) -> Result<Vec<u8>, TransferError> {
    let headers =
        ResponseHeaders::from_pairs(wire.headers.iter().map(|(n, v)| (*n, v.as_str())))?;
    let mut body = verify_download(Cursor::new(wire.body.clone()), &headers, config)?;
    let mut out = Vec::new();
    body.read_to_end(&mut out)?;
    Ok(out)
}

// ── Strategies ────────────────────────────────────────────────────────────────

#[test]
fn structured_message_survives_the_wire() {
    let config = TransferConfig::with_validation(TransferValidation::StructuredMessage);
    let wire = upload(&config);
    assert_eq!(wire.body.len(), 61);
    assert_eq!(download(&wire, &config).unwrap(), PAYLOAD);
}

#[test]
fn computed_crc64_survives_the_wire() {
    let config = TransferConfig::with_validation(TransferValidation::ComputeCrc64);
    let wire = upload(&config);
    assert_eq!(wire.body, PAYLOAD);
    assert!(
        wire.headers
            .contains(&(CONTENT_CRC64, encode_crc64(checksum(PAYLOAD))))
    );
    assert_eq!(download(&wire, &config).unwrap(), PAYLOAD);
}

#[test]
fn precomputed_crc64_is_sent_verbatim() {
    let crc = checksum(PAYLOAD);
    let config = TransferConfig::with_validation(TransferValidation::PrecomputedCrc64(crc));
    let wire = upload(&config);
    assert!(wire.headers.contains(&(CONTENT_CRC64, encode_crc64(crc))));
    assert_eq!(download(&wire, &config).unwrap(), PAYLOAD);
}

#[test]
fn no_validation_passes_bytes_through() {
    let config = TransferConfig::default();
    let wire = upload(&config);
    assert_eq!(wire.headers, vec![("Content-Length", "22".to_string())]);
    assert_eq!(download(&wire, &config).unwrap(), PAYLOAD);
}

// ── Corruption in flight ──────────────────────────────────────────────────────

#[test]
fn structured_body_corrupted_in_flight() {
    let config = TransferConfig::with_validation(TransferValidation::StructuredMessage);
    let mut wire = upload(&config);
    wire.body[30] ^= 0x04;
    let err = download(&wire, &config).unwrap_err();
    assert!(matches!(
        err,
        TransferError::Decode(DecodeError::Wire(WireError::ValidationFailed { .. }))
    ));
    assert!(err.to_string().contains("validation failed"));
}

#[test]
fn plain_body_corrupted_in_flight() {
    let config = TransferConfig::with_validation(TransferValidation::ComputeCrc64);
    let mut wire = upload(&config);
    wire.body[0] ^= 0x01;
    let err = download(&wire, &config).unwrap_err();
    assert!(matches!(err, TransferError::Crc64Mismatch { .. }));
    assert!(err.to_string().contains("validation failed"));
}

#[test]
fn structured_content_length_header_tampered() {
    let config = TransferConfig::with_validation(TransferValidation::StructuredMessage);
    let mut wire = upload(&config);
    for (name, value) in &mut wire.headers {
        if name.eq_ignore_ascii_case("x-ms-structured-content-length") {
            *value = "23".to_string();
        }
    }
    let err = download(&wire, &config).unwrap_err();
    assert!(matches!(
        err,
        TransferError::Decode(DecodeError::ContentLengthMismatch { .. })
    ));
}

#[test]
fn structured_download_without_body_type_header() {
    let config = TransferConfig::with_validation(TransferValidation::StructuredMessage);
    let mut wire = upload(&config);
    wire.headers.retain(|(name, _)| *name != "x-ms-structured-body");
    assert!(matches!(
        download(&wire, &config).unwrap_err(),
        TransferError::MissingHeader { .. }
    ));
}

// ── Retries ───────────────────────────────────────────────────────────────────

#[test]
fn upload_body_replays_after_rewind() {
    let config = TransferConfig::with_validation(TransferValidation::StructuredMessage);
    let mut prepared = prepare_upload(Cursor::new(PAYLOAD.to_vec()), &config).unwrap();

    let mut first = Vec::new();
    prepared.body.read_to_end(&mut first).unwrap();
    prepared.body.seek(SeekFrom::Start(0)).unwrap();
    let mut second = Vec::new();
    prepared.body.read_to_end(&mut second).unwrap();
    assert_eq!(first, second);

    prepared.body.close();
    prepared.body.close();
    assert_eq!(prepared.body.read(&mut [0u8; 8]).unwrap(), 0);
}

// ── Async source ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn async_download_decodes_structured_upload() {
    let config = TransferConfig::with_validation(TransferValidation::StructuredMessage);
    let wire = upload(&config);
    let decoder = DecoderReader::from_async_reader(&wire.body[..], PAYLOAD.len() as u64)
        .await
        .unwrap();
    assert_eq!(decoder.decoded(), PAYLOAD);
}
