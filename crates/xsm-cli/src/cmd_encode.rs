/// Implementation of `xsm encode`.
///
/// Runs the file through the same upload preparation a transport would,
/// writes the resulting body to `--output`, and prints the headers that
/// would accompany it.
///
/// # Output format
///
/// ```text
/// Content-Length: 61
/// x-ms-structured-body: XSM/1.0; properties=crc64
/// x-ms-structured-content-length: 22
/// ```
use std::fs::{self, File};
use std::io;

use anyhow::{Context, Result};
use xsm_transfer::{TransferConfig, prepare_upload};

use crate::EncodeArgs;

/// Run the `xsm encode` command.
///
/// # Errors
///
/// Returns an error if the input cannot be opened, exceeds `--max-size`,
/// or the output cannot be written.
pub fn run(args: &EncodeArgs) -> Result<()> {
    let input =
        File::open(&args.input).with_context(|| format!("cannot open {}", args.input.display()))?;

    let config = TransferConfig {
        validation: Some(args.strategy.validation()),
        max_buffered_len: args.max_size,
    };
    let prepared = prepare_upload(input, &config)
        .with_context(|| format!("failed to encode {}", args.input.display()))?;

    let mut body = prepared.body;
    let mut output = fs::File::create(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;
    let written = io::copy(&mut body, &mut output)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    body.close();

    tracing::debug!(written, output = %args.output.display(), "wrote encoded body");

    for (name, value) in prepared.headers.to_pairs() {
        println!("{name}: {value}");
    }
    Ok(())
}
