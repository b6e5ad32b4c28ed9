//! Binary-coded-decimal codec for the DS1307 registers.
//!
//! Every time and date register on the chip packs its value as two decimal
//! digits, one per nibble. These helpers convert between packed BCD bytes
//! and plain binary, and test whether a byte is well-formed BCD.

/// Decodes a packed BCD byte into its binary value.
///
/// Does not validate its input; callers that need validity must check
/// [`is_valid`] first. Defined for every byte value, but only meaningful
/// for well-formed BCD.
#[must_use]
pub const fn decode(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// Encodes a binary value in 0-99 as a packed BCD byte.
///
/// Does not validate the range; the caller must ensure `value <= 99`.
#[must_use]
pub const fn encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Returns true when both nibbles of `byte` are decimal digits.
#[must_use]
pub const fn is_valid(byte: u8) -> bool {
    (byte >> 4) <= 9 && (byte & 0x0F) <= 9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        for value in 0..=99u8 {
            assert_eq!(decode(encode(value)), value, "roundtrip failed for {value}");
        }
    }

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode(0x00), 0);
        assert_eq!(decode(0x09), 9);
        assert_eq!(decode(0x10), 10);
        assert_eq!(decode(0x45), 45);
        assert_eq!(decode(0x59), 59);
        assert_eq!(decode(0x99), 99);
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(0), 0x00);
        assert_eq!(encode(9), 0x09);
        assert_eq!(encode(10), 0x10);
        assert_eq!(encode(45), 0x45);
        assert_eq!(encode(99), 0x99);
    }

    #[test]
    fn test_is_valid_accepts_all_bcd() {
        for tens in 0..=9u8 {
            for ones in 0..=9u8 {
                assert!(is_valid((tens << 4) | ones));
            }
        }
    }

    #[test]
    fn test_is_valid_rejects_bad_nibbles() {
        // High nibble out of range
        assert!(!is_valid(0xA0));
        assert!(!is_valid(0xF9));
        // Low nibble out of range
        assert!(!is_valid(0x0A));
        assert!(!is_valid(0x1A));
        assert!(!is_valid(0x9F));
        // Both nibbles out of range
        assert!(!is_valid(0xFF));
    }
}
