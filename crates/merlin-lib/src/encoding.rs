//! DNA nucleotide encoding
//!
//! 2-bit encoding in alphabetical order, so that the numeric order of a packed
//! k-mer is the lexicographic order of its string form:
//! - A (65/97)  -> 00
//! - C (67/99)  -> 01
//! - G (71/103) -> 10
//! - T (84/116) -> 11

use thiserror::Error;

/// Error type for encoding operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The input byte is not a valid DNA base (A/C/G/T)
    #[error("Invalid DNA base {base:?} at position {position}")]
    InvalidBase {
        /// Offending character
        base: char,
        /// Position of the byte in the input
        position: usize,
    },
    /// The input string length is not a supported k-mer width
    #[error("Unsupported k-mer length {0}: must be between 1 and 32")]
    UnsupportedLength(usize),
    /// The input string length does not match the expected k-mer length
    #[error("K-mer length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Expected k-mer length
        expected: usize,
        /// Actual string length
        actual: usize,
    },
}

/// Encode a single DNA nucleotide to 2 bits, or `None` for anything outside ACGT
#[inline]
pub const fn encode_base(base: u8) -> Option<u8> {
    match base {
        b'A' | b'a' => Some(0b00),
        b'C' | b'c' => Some(0b01),
        b'G' | b'g' => Some(0b10),
        b'T' | b't' => Some(0b11),
        _ => None,
    }
}

/// Decode a 2-bit value to DNA nucleotide (uppercase)
#[inline]
pub const fn decode_base(bits: u8) -> u8 {
    match bits & 0b11 {
        0b00 => b'A',
        0b01 => b'C',
        0b10 => b'G',
        _ => b'T',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_base() {
        assert_eq!(encode_base(b'A'), Some(0b00));
        assert_eq!(encode_base(b'a'), Some(0b00));
        assert_eq!(encode_base(b'C'), Some(0b01));
        assert_eq!(encode_base(b'g'), Some(0b10));
        assert_eq!(encode_base(b'T'), Some(0b11));

        assert_eq!(encode_base(b'N'), None);
        assert_eq!(encode_base(b'-'), None);
    }

    #[test]
    fn test_decode_base() {
        assert_eq!(decode_base(0b00), b'A');
        assert_eq!(decode_base(0b01), b'C');
        assert_eq!(decode_base(0b10), b'G');
        assert_eq!(decode_base(0b11), b'T');
    }

    #[test]
    fn test_code_order_is_alphabetical() {
        let codes: Vec<u8> = b"ACGT".iter().map(|&b| encode_base(b).unwrap()).collect();
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_error_messages() {
        let err = EncodingError::InvalidBase { base: 'N', position: 3 };
        assert_eq!(err.to_string(), "Invalid DNA base 'N' at position 3");
    }
}
