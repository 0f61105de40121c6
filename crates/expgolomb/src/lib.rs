//! Exp-Golomb (`ue(v)` / `se(v)`) decoding as used by H.264 and H.265
//! parameter sets.
//!
//! ```rust
//! use erlab_bytes_util::BitReader;
//! use erlab_expgolomb::BitReaderExpGolombExt;
//!
//! // 1 | 010 | 011
//! let mut reader = BitReader::new_from_slice([0b1010_0110]);
//! assert_eq!(reader.read_exp_golomb().unwrap(), 0);
//! assert_eq!(reader.read_exp_golomb().unwrap(), 1);
//! assert_eq!(reader.read_signed_exp_golomb().unwrap(), -1);
//! ```
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

use std::io;

use erlab_bytes_util::BitReader;

/// Codes with more leading zeros than this are treated as corrupt.
const MAX_LEADING_ZEROS: u8 = 31;

/// Extension trait for reading Exp-Golomb encoded numbers from a bit reader.
pub trait BitReaderExpGolombExt {
    /// Reads an unsigned Exp-Golomb encoded number.
    fn read_exp_golomb(&mut self) -> io::Result<u64>;

    /// Reads a signed Exp-Golomb encoded number.
    ///
    /// Code numbers map as 0, 1, -1, 2, -2, ...
    fn read_signed_exp_golomb(&mut self) -> io::Result<i64> {
        let exp_golomb = self.read_exp_golomb()?;

        if exp_golomb % 2 == 0 {
            Ok(-((exp_golomb / 2) as i64))
        } else {
            Ok((exp_golomb / 2) as i64 + 1)
        }
    }
}

impl<R: io::Read> BitReaderExpGolombExt for BitReader<R> {
    fn read_exp_golomb(&mut self) -> io::Result<u64> {
        let mut leading_zeros = 0;
        while !self.read_bit()? {
            leading_zeros += 1;
            if leading_zeros > MAX_LEADING_ZEROS {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "exp-golomb code has too many leading zeros",
                ));
            }
        }

        let suffix = self.read_bits(leading_zeros)?;
        Ok((1 << leading_zeros) - 1 + suffix)
    }
}
