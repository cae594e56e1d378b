//! # Flag Byte Encoding
//!
//! Boolean fields marked as flags travel as a single byte in which bit N
//! carries the value. Each flag field owns its byte; flags are not packed
//! together.
//!
//! ## Wire Format
//! - One byte, bit N set = flag is true (little-endian bit order within the byte)

use crate::types::Error;
use crate::types::Result;

/// Highest bit index addressable in one flag byte.
pub const MAX_BIT: u8 = 7;

/// Returns `byte` with `bit` set to `value`.
///
/// # Errors
/// Returns `Error::FlagOverflow` if `bit` is greater than `MAX_BIT`.
pub fn set(byte: u8, bit: u8, value: bool) -> Result<u8> {
    if bit > MAX_BIT {
        return Err(Error::FlagOverflow(bit));
    }
    if value {
        Ok(byte | (1 << bit))
    } else {
        Ok(byte & !(1 << bit))
    }
}

/// Extracts `bit` from `byte`.
///
/// # Errors
/// Returns `Error::FlagOverflow` if `bit` is greater than `MAX_BIT`.
pub fn get(byte: u8, bit: u8) -> Result<bool> {
    if bit > MAX_BIT {
        return Err(Error::FlagOverflow(bit));
    }
    Ok(byte & (1 << bit) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_each_bit() {
        for bit in 0..=MAX_BIT {
            assert_eq!(set(0, bit, true).unwrap(), 1 << bit);
            assert_eq!(set(0, bit, false).unwrap(), 0);
        }
    }

    #[test]
    fn test_set_preserves_other_bits() {
        let byte = set(0b1010_0000, 0, true).unwrap();
        assert_eq!(byte, 0b1010_0001);

        let byte = set(byte, 7, false).unwrap();
        assert_eq!(byte, 0b0010_0001);
    }

    #[test]
    fn test_get_roundtrip() {
        for bit in 0..=MAX_BIT {
            for value in [true, false] {
                let byte = set(0, bit, value).unwrap();
                assert_eq!(get(byte, bit).unwrap(), value);
            }
        }
    }

    #[test]
    fn test_get_ignores_other_bits() {
        assert!(!get(0b1111_1110, 0).unwrap());
        assert!(get(0b0000_0100, 2).unwrap());
    }

    #[test]
    fn test_bit_overflow_error() {
        assert_eq!(set(0, 8, true), Err(Error::FlagOverflow(8)));
        assert_eq!(get(0, 9), Err(Error::FlagOverflow(9)));
    }
}
