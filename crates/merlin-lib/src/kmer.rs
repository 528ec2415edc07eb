//! K-mer representation
//!
//! A k-mer of width 1..=32 packed two bits per base into a `u64`, first base
//! in the most significant position. With the alphabetical base codes from
//! [`crate::encoding`], comparing packed values compares string forms, so the
//! canonical k-mer (smaller of forward and reverse complement) is also the
//! lexicographically smaller string.

use crate::constants::{is_valid_k, MAX_K};
use crate::encoding::{decode_base, encode_base, EncodingError};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Which strand of a canonical k-mer was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    /// The observed k-mer is its own canonical form
    Forward,
    /// The observed k-mer is the reverse complement of its canonical form
    Reverse,
}

impl Orientation {
    /// Sign character used in linkage-graph output
    #[inline]
    pub const fn sign(self) -> char {
        match self {
            Orientation::Forward => '+',
            Orientation::Reverse => '-',
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}

/// Fixed-width DNA k-mer
#[derive(Clone, Copy)]
pub struct Kmer {
    bits: u64,
    k: u8,
}

impl Kmer {
    /// Create a k-mer from raw packed bits; bits above `2k` are discarded
    ///
    /// # Panics
    /// Panics if `k` is outside 1..=32.
    #[inline]
    pub fn from_bits(bits: u64, k: usize) -> Self {
        assert!(is_valid_k(k), "k-mer width {} out of range", k);
        Self { bits: bits & Self::mask(k), k: k as u8 }
    }

    #[inline]
    const fn mask(k: usize) -> u64 {
        if k >= MAX_K {
            u64::MAX
        } else {
            (1u64 << (2 * k)) - 1
        }
    }

    /// Raw packed bits
    #[inline]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Width in bases
    #[inline]
    pub fn k(&self) -> usize {
        self.k as usize
    }

    /// Create a k-mer from a DNA string; its length defines `k`
    ///
    /// # Errors
    /// Returns an error if the string is empty, longer than 32 bases, or
    /// contains anything other than A, C, G, T (either case).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, EncodingError> {
        Self::from_bytes(s.as_bytes())
    }

    /// Create a k-mer from DNA bytes; see [`Kmer::from_str`]
    pub fn from_bytes(seq: &[u8]) -> Result<Self, EncodingError> {
        if !is_valid_k(seq.len()) {
            return Err(EncodingError::UnsupportedLength(seq.len()));
        }
        let mut bits = 0u64;
        for (position, &base) in seq.iter().enumerate() {
            let code = encode_base(base).ok_or(EncodingError::InvalidBase {
                base: base as char,
                position,
            })?;
            bits = (bits << 2) | code as u64;
        }
        Ok(Self { bits, k: seq.len() as u8 })
    }

    /// Parse a DNA string that must have exactly `k` bases
    pub fn from_str_with_k(s: &str, k: usize) -> Result<Self, EncodingError> {
        if s.len() != k {
            return Err(EncodingError::LengthMismatch { expected: k, actual: s.len() });
        }
        Self::from_str(s)
    }

    /// Shift one encoded base in at the right end, dropping the leftmost base
    #[inline]
    pub fn push_base(self, code: u8) -> Self {
        let bits = ((self.bits << 2) | (code & 0b11) as u64) & Self::mask(self.k());
        Self { bits, k: self.k }
    }

    /// Get the reverse complement of this k-mer
    pub fn reverse_complement(&self) -> Self {
        let k = self.k();
        // Complement every base, then reverse the 2-bit groups.
        let mut x = !self.bits;
        x = ((x >> 2) & 0x3333_3333_3333_3333) | ((x & 0x3333_3333_3333_3333) << 2);
        x = ((x >> 4) & 0x0F0F_0F0F_0F0F_0F0F) | ((x & 0x0F0F_0F0F_0F0F_0F0F) << 4);
        x = x.swap_bytes();
        // The k bases now sit in the top 2k bits.
        x >>= 64 - 2 * k;
        Self { bits: x & Self::mask(k), k: self.k }
    }

    /// Canonical representation (minimum of forward and reverse complement)
    pub fn canonical(&self) -> Self {
        self.canonical_with_orientation().0
    }

    /// Canonical representation plus the strand this k-mer lies on relative to it
    ///
    /// Palindromes are reported as [`Orientation::Forward`].
    #[inline]
    pub fn canonical_with_orientation(&self) -> (Self, Orientation) {
        let rc = self.reverse_complement();
        if rc.bits < self.bits {
            (rc, Orientation::Reverse)
        } else {
            (*self, Orientation::Forward)
        }
    }

    /// Whether this k-mer is its own canonical form
    #[inline]
    pub fn is_canonical(&self) -> bool {
        self.bits <= self.reverse_complement().bits
    }

    /// Extract the encoded base at a position (0 = leftmost)
    pub fn get_base(&self, pos: usize) -> u8 {
        assert!(pos < self.k(), "Position {} out of bounds for k-mer of length {}", pos, self.k);
        ((self.bits >> (2 * (self.k() - 1 - pos))) & 0b11) as u8
    }
}

impl PartialEq for Kmer {
    fn eq(&self, other: &Self) -> bool {
        self.k == other.k && self.bits == other.bits
    }
}

impl Eq for Kmer {}

impl PartialOrd for Kmer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Kmer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.k.cmp(&other.k).then(self.bits.cmp(&other.bits))
    }
}

impl Hash for Kmer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl fmt::Debug for Kmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kmer<{}>(\"{}\")", self.k, self)
    }
}

impl fmt::Display for Kmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in 0..self.k() {
            write!(f, "{}", decode_base(self.get_base(pos)) as char)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Kmer {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kmer::from_bytes(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kmer_from_str() {
        let kmer = Kmer::from_str("ACGTG").unwrap();
        assert_eq!(kmer.k(), 5);
        assert_eq!(kmer.to_string(), "ACGTG");

        let kmer = Kmer::from_str("ACGTACGTACGTACGTACGTACGTACGTACGT").unwrap();
        assert_eq!(kmer.k(), 32);
        assert_eq!(kmer.to_string(), "ACGTACGTACGTACGTACGTACGTACGTACGT");
    }

    #[test]
    fn test_kmer_reverse_complement() {
        let kmer = Kmer::from_str("ACGTG").unwrap();
        assert_eq!(kmer.reverse_complement().to_string(), "CACGT");

        let kmer = Kmer::from_str("AAAC").unwrap();
        assert_eq!(kmer.reverse_complement().to_string(), "GTTT");

        let kmer = Kmer::from_str("TTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTG").unwrap();
        assert_eq!(kmer.reverse_complement().to_string(), "CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
    }

    #[test]
    fn test_kmer_canonical() {
        let kmer = Kmer::from_str("GTTT").unwrap();
        let (canon, orientation) = kmer.canonical_with_orientation();
        assert_eq!(canon.to_string(), "AAAC");
        assert_eq!(orientation, Orientation::Reverse);

        let (canon, orientation) = canon.canonical_with_orientation();
        assert_eq!(canon.to_string(), "AAAC");
        assert_eq!(orientation, Orientation::Forward);
    }

    #[test]
    fn test_palindrome_is_forward() {
        let kmer = Kmer::from_str("ACGT").unwrap();
        assert_eq!(kmer.reverse_complement(), kmer);
        assert_eq!(kmer.canonical_with_orientation().1, Orientation::Forward);
        assert!(kmer.is_canonical());
    }

    #[test]
    fn test_kmer_case_insensitive() {
        assert_eq!(Kmer::from_str("acgtg").unwrap(), Kmer::from_str("ACGTG").unwrap());
    }

    #[test]
    fn test_kmer_invalid() {
        assert!(Kmer::from_str("").is_err());
        assert!(Kmer::from_str("ACGN").is_err());
        assert!(Kmer::from_str(&"A".repeat(33)).is_err());
        assert!(Kmer::from_str_with_k("ACGT", 5).is_err());
    }

    #[test]
    fn test_push_base() {
        let kmer = Kmer::from_str("AAAA").unwrap();
        let next = kmer.push_base(encode_base(b'C').unwrap());
        assert_eq!(next.to_string(), "AAAC");
    }

    #[test]
    fn test_kmer_ordering_matches_strings() {
        let mut kmers: Vec<Kmer> = ["TTGA", "AACC", "GATC", "ACGT"]
            .iter()
            .map(|s| Kmer::from_str(s).unwrap())
            .collect();
        kmers.sort();
        let strings: Vec<String> = kmers.iter().map(|k| k.to_string()).collect();
        assert_eq!(strings, vec!["AACC", "ACGT", "GATC", "TTGA"]);
    }

    #[test]
    fn test_orientation_sign() {
        assert_eq!(Orientation::Forward.sign(), '+');
        assert_eq!(Orientation::Reverse.sign(), '-');
    }
}
