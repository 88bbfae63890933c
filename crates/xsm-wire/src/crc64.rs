use std::io;

/// CRC64 polynomial used by every checksum in a structured message.
///
/// This is the reflected form of the CRC-64/NVME polynomial. It is neither
/// CRC-64/ISO nor CRC-64/ECMA, and peers that use either of those will
/// disagree with every checksum we produce.
pub const POLYNOMIAL: u64 = 0x9A6C_9329_AC4B_C9B5;

/// Width of an encoded checksum on the wire, in bytes.
pub const CRC64_SIZE: usize = 8;

/// Byte-at-a-time lookup table, built at compile time.
static TABLE: [u64; 256] = build_table(POLYNOMIAL);

const fn build_table(poly: u64) -> [u64; 256] {
    let mut table = [0u64; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u64;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 == 1 { (crc >> 1) ^ poly } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Feed `data` through the table, operating on the raw (inverted) register.
fn feed(mut register: u64, data: &[u8]) -> u64 {
    for &byte in data {
        #[allow(clippy::cast_possible_truncation)]
        let index = (register as u8) ^ byte;
        register = TABLE[index as usize] ^ (register >> 8);
    }
    register
}

/// Compute the CRC64 of `data` in one pass.
///
/// ```rust
/// use xsm_wire::crc64::checksum;
///
/// assert_eq!(checksum(b"123456789"), 0xAE8B_1486_0A79_9888);
/// assert_eq!(checksum(b""), 0);
/// ```
#[must_use]
pub fn checksum(data: &[u8]) -> u64 {
    update(0, data)
}

/// Extend a finished checksum with more bytes.
///
/// The value returned by [`checksum`] can be passed back in as `crc`, so
/// `update(update(0, a), b) == checksum(a ++ b)`. Starting from `0` is the
/// same as starting from the empty input.
#[must_use]
pub fn update(crc: u64, data: &[u8]) -> u64 {
    !feed(!crc, data)
}

/// Incremental CRC64 state.
///
/// Accumulates a checksum over input that arrives in arbitrary chunks.
/// [`finalize`](Self::finalize) does not consume or alter the state, so
/// it can be called any number of times and more data can follow.
///
/// ```rust
/// use xsm_wire::crc64::{Crc64, checksum};
///
/// let mut crc = Crc64::new();
/// crc.update(b"hello ");
/// crc.update(b"world");
/// assert_eq!(crc.finalize(), checksum(b"hello world"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc64 {
    register: u64,
}

impl Crc64 {
    #[must_use]
    pub fn new() -> Self {
        Self { register: !0 }
    }

    /// Resume from a previously finalized checksum.
    #[must_use]
    pub fn with_initial(crc: u64) -> Self {
        Self { register: !crc }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.register = feed(self.register, data);
    }

    #[must_use]
    pub fn finalize(&self) -> u64 {
        !self.register
    }

    pub fn reset(&mut self) {
        self.register = !0;
    }
}

impl Default for Crc64 {
    fn default() -> Self {
        Self::new()
    }
}

/// Lets a reader be checksummed with [`io::copy`].
impl io::Write for Crc64 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_polynomial() {
        assert_eq!(TABLE[0], 0);
        assert_eq!(TABLE[1], 0x7F6E_F0C8_3035_8979);
        assert_eq!(TABLE[128], POLYNOMIAL);
        assert_eq!(TABLE[255], 0x2ADA_5047_EFEC_8728);
    }

    #[test]
    fn io_copy_retries_interrupted_reads() {
        struct Flaky<'a> {
            data: &'a [u8],
            interrupt: bool,
        }

        impl io::Read for Flaky<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.interrupt = !self.interrupt;
                if self.interrupt {
                    return Err(io::ErrorKind::Interrupted.into());
                }
                let n = buf.len().min(self.data.len()).min(4);
                buf[..n].copy_from_slice(&self.data[..n]);
                self.data = &self.data[n..];
                Ok(n)
            }
        }

        let mut source = Flaky {
            data: b"123456789",
            interrupt: false,
        };
        let mut crc = Crc64::new();
        assert_eq!(io::copy(&mut source, &mut crc).unwrap(), 9);
        assert_eq!(crc.finalize(), 0xAE8B_1486_0A79_9888);
    }

    #[test]
    fn check_value() {
        assert_eq!(checksum(b"123456789"), 0xAE8B_1486_0A79_9888);
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(Crc64::new().finalize(), 0);
    }

    #[test]
    fn known_vectors() {
        assert_eq!(checksum(b"abc"), 0x05E5_CABB_3FC1_FAEB);
        assert_eq!(checksum(b"hello world test data!"), 0x8751_6821_1CC5_1B01);
    }

    #[test]
    fn update_chains_like_go_style_api() {
        let first = checksum(b"hello ");
        assert_eq!(update(first, b"world"), checksum(b"hello world"));
        assert_eq!(update(0, b"hello world"), 0x8D29_D5C3_F6EA_8EBE);
    }

    #[test]
    fn incremental_matches_one_shot_for_every_split() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let expected = checksum(data);
        for split in 0..=data.len() {
            let mut crc = Crc64::new();
            crc.update(&data[..split]);
            crc.update(&data[split..]);
            assert_eq!(crc.finalize(), expected, "split at {split}");
        }
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut crc = Crc64::new();
        crc.update(b"payload");
        assert_eq!(crc.finalize(), crc.finalize());
    }

    #[test]
    fn with_initial_resumes() {
        let mut crc = Crc64::with_initial(checksum(b"hello "));
        crc.update(b"world");
        assert_eq!(crc.finalize(), checksum(b"hello world"));
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut crc = Crc64::new();
        crc.update(b"garbage");
        crc.reset();
        assert_eq!(crc, Crc64::default());
    }
}
