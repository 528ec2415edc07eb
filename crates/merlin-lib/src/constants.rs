//! Constants shared across the graph pipeline
//!
//! K-mer width limits, resource heuristics and output format strings.

/// Minimum k-mer size supported
pub const MIN_K: usize = 1;

/// Maximum k-mer size supported (2 bits per base in a `u64`)
pub const MAX_K: usize = 32;

/// Default k-mer size
pub const DEFAULT_K: usize = 21;

/// Default memory budget in GiB
pub const DEFAULT_MAX_MEMORY_GIB: usize = 8;

/// Bytes in a GiB
pub const GIB: usize = 1 << 30;

/// Estimated bytes held per in-flight base: raw sequence plus one extracted
/// observation per k-mer window.
pub const BYTES_PER_INFLIGHT_BASE: usize = 40;

/// Share of the memory budget granted to in-flight sequence batches; the rest
/// is left to the graph.
pub const INFLIGHT_MEMORY_DIVISOR: usize = 16;

/// Lower bound on the number of bases read per batch
pub const MIN_BATCH_BASES: usize = 1 << 20;

/// Number of extraction results that may queue up ahead of the merge stage,
/// per worker thread
pub const MERGE_QUEUE_DEPTH_PER_THREAD: usize = 64;

/// GFA header line
pub const GFA_HEADER: &str = "H\tVN:Z:1.0";

/// Header line of the tabular node summary
pub const CSV_HEADER: &str = "Name,Value,Color";

/// Extension appended to compressed outputs
pub const GZIP_SUFFIX: &str = ".gz";

/// Version number
pub const VERSION: (u8, u8, u8) = (0, 1, 0);

/// Check if a k-mer size is valid
#[inline]
pub const fn is_valid_k(k: usize) -> bool {
    k >= MIN_K && k <= MAX_K
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_k() {
        assert!(!is_valid_k(0));
        assert!(is_valid_k(1));
        assert!(is_valid_k(4));
        assert!(is_valid_k(21));
        assert!(is_valid_k(32));
        assert!(!is_valid_k(33));
    }
}
