//! Sliding-window k-mer extraction over one sequence
//!
//! Yields every window of `k` consecutive valid bases as its canonical k-mer,
//! the 0-based start of the window, and the strand the read showed. Any byte
//! outside ACGT breaks the window; scanning restarts after it.

use crate::encoding::encode_base;
use crate::kmer::{Kmer, Orientation};

/// One k-mer window observed in a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmerHit {
    /// Canonical k-mer
    pub kmer: Kmer,
    /// 0-based start of the window in the sequence
    pub position: usize,
    /// Strand of the canonical k-mer the read matched at this position
    pub orientation: Orientation,
}

/// Iterator over the k-mer windows of a sequence
pub struct KmerStream<'a> {
    seq: &'a [u8],
    k: usize,
    next: usize,
    current: Kmer,
    valid: usize,
}

impl<'a> KmerStream<'a> {
    /// Stream the k-mers of `seq` with width `k`
    ///
    /// # Panics
    /// Panics if `k` is outside 1..=32; callers validate `k` up front.
    pub fn new(seq: &'a [u8], k: usize) -> Self {
        Self {
            seq,
            k,
            next: 0,
            current: Kmer::from_bits(0, k),
            valid: 0,
        }
    }

    /// Number of full windows a sequence of `len` bases has, ignoring invalid bases
    pub fn max_windows(len: usize, k: usize) -> usize {
        len.saturating_sub(k - 1)
    }
}

impl Iterator for KmerStream<'_> {
    type Item = KmerHit;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.seq.len() {
            let base = self.seq[self.next];
            self.next += 1;

            match encode_base(base) {
                Some(code) => {
                    self.current = self.current.push_base(code);
                    self.valid += 1;
                }
                None => {
                    self.valid = 0;
                    continue;
                }
            }

            if self.valid >= self.k {
                let (kmer, orientation) = self.current.canonical_with_orientation();
                return Some(KmerHit {
                    kmer,
                    position: self.next - self.k,
                    orientation,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(seq: &[u8], k: usize) -> Vec<(String, usize, Orientation)> {
        KmerStream::new(seq, k)
            .map(|hit| (hit.kmer.to_string(), hit.position, hit.orientation))
            .collect()
    }

    #[test]
    fn test_simple_windows() {
        let hits = collect(b"AAAACCCC", 4);
        let kmers: Vec<&str> = hits.iter().map(|(s, _, _)| s.as_str()).collect();
        assert_eq!(kmers, vec!["AAAA", "AAAC", "AACC", "ACCC", "CCCC"]);
        let positions: Vec<usize> = hits.iter().map(|(_, p, _)| *p).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
        assert!(hits.iter().all(|(_, _, o)| *o == Orientation::Forward));
    }

    #[test]
    fn test_reverse_strand_reported_canonically() {
        let hits = collect(b"GTTT", 4);
        assert_eq!(hits, vec![("AAAC".to_string(), 0, Orientation::Reverse)]);
    }

    #[test]
    fn test_invalid_base_breaks_window() {
        let hits = collect(b"ACGNACGTA", 3);
        let positions: Vec<usize> = hits.iter().map(|(_, p, _)| *p).collect();
        assert_eq!(positions, vec![0, 4, 5, 6]);
    }

    #[test]
    fn test_short_sequences() {
        assert!(collect(b"", 4).is_empty());
        assert!(collect(b"ACG", 4).is_empty());
        assert_eq!(collect(b"ACGA", 4).len(), 1);
        assert_eq!(KmerStream::max_windows(3, 4), 0);
        assert_eq!(KmerStream::max_windows(8, 4), 5);
    }

    #[test]
    fn test_lowercase_input() {
        assert_eq!(collect(b"aaaacccc", 4), collect(b"AAAACCCC", 4));
    }
}
