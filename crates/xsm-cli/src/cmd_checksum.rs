/// Implementation of `xsm checksum`.
///
/// Streams each file through the CRC64 and prints the value in hex and in
/// the base64 form the transport header uses.
///
/// ```text
/// 0xae8b14860a799888  iJh5CoYUi64=  digits.txt
/// ```
use std::fs::File;
use std::io;

use anyhow::{Context, Result};
use xsm_transfer::headers::encode_crc64;
use xsm_wire::Crc64;

use crate::ChecksumArgs;

/// Run the `xsm checksum` command.
///
/// # Errors
///
/// Returns an error if any file cannot be read.
pub fn run(args: &ChecksumArgs) -> Result<()> {
    for path in &args.files {
        let mut file =
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        let mut crc = Crc64::new();
        io::copy(&mut file, &mut crc).with_context(|| format!("cannot read {}", path.display()))?;
        let crc = crc.finalize();
        println!("{crc:#018x}  {}  {}", encode_crc64(crc), path.display());
    }
    Ok(())
}
