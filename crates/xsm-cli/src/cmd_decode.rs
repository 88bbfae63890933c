/// Implementation of `xsm decode`.
///
/// Validates a structured message the way a download would and writes the
/// recovered payload to `--output` or stdout.
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use xsm_transfer::{ResponseHeaders, TransferConfig, TransferValidation, verify_download};
use xsm_wire::{STRUCTURED_BODY_TYPE, validate_message};

use crate::DecodeArgs;

/// Run the `xsm decode` command.
///
/// # Errors
///
/// Returns an error if the file is larger than `--max-size` or cannot be
/// read, the message is malformed or corrupt, its payload length differs
/// from `--content-length`, or the payload cannot be written.
pub fn run(args: &DecodeArgs) -> Result<()> {
    let len = fs::metadata(&args.input)
        .with_context(|| format!("cannot stat {}", args.input.display()))?
        .len();
    ensure_within_limit(&args.input, len, args.max_size)?;

    let bytes =
        fs::read(&args.input).with_context(|| format!("cannot read {}", args.input.display()))?;

    let payload = match args.content_length {
        Some(content_length) => {
            let headers = ResponseHeaders {
                structured_body_type: Some(STRUCTURED_BODY_TYPE.to_string()),
                structured_content_length: Some(content_length),
                ..ResponseHeaders::default()
            };
            let config = TransferConfig {
                validation: Some(TransferValidation::StructuredMessage),
                max_buffered_len: args.max_size,
            };
            let mut body = verify_download(&bytes[..], &headers, &config)
                .with_context(|| format!("failed to decode {}", args.input.display()))?;
            let mut payload = Vec::new();
            body.read_to_end(&mut payload)?;
            body.close();
            payload
        }
        None => {
            tracing::warn!("no --content-length given; truncation guard uses the message itself");
            validate_message(&bytes)
                .with_context(|| format!("failed to decode {}", args.input.display()))?
                .decoded()
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &payload).with_context(|| format!("cannot write {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(&payload).context("cannot write to stdout")?;
            lock.flush().context("cannot write to stdout")?;
        }
    }
    Ok(())
}

/// Refuse a file before reading it if it exceeds `--max-size`.
fn ensure_within_limit(path: &Path, len: u64, limit: usize) -> Result<()> {
    if len > limit as u64 {
        bail!(
            "{} is {len} bytes, over the --max-size limit of {limit} bytes",
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_inclusive() {
        assert!(ensure_within_limit(Path::new("m.xsm"), 61, 61).is_ok());
    }

    #[test]
    fn oversized_file_is_refused_before_reading() {
        let err = ensure_within_limit(Path::new("m.xsm"), 62, 61).unwrap_err();
        assert_eq!(
            err.to_string(),
            "m.xsm is 62 bytes, over the --max-size limit of 61 bytes"
        );
    }
}
