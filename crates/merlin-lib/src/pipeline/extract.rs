//! Per-read k-mer extraction
//!
//! Runs on worker threads and touches only read-local data: it scans one
//! sequence with [`KmerStream`], classifies each k-mer against the optional
//! marker table and keeps the observations that pass.

use crate::kmer::{Kmer, Orientation};
use crate::kmer_stream::KmerStream;
use crate::markers::{MarkerClassifier, ValueBounds};

/// A k-mer kept for graph construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmerObservation {
    /// Canonical k-mer
    pub kmer: Kmer,
    /// 0-based position in the read
    pub position: usize,
    /// Strand of the canonical k-mer seen in the read
    pub orientation: Orientation,
    /// Marker value, 0 when no marker table filters the build
    pub value: u64,
}

/// Everything extracted from one read, ready for the merge stage
#[derive(Debug, Clone, Default)]
pub struct ReadExtraction {
    /// Read name
    pub name: String,
    /// Number of k-mer windows scanned
    pub total_kmers: u64,
    /// Kept observations in read order
    pub observations: Vec<KmerObservation>,
}

/// Extraction settings shared by all workers
#[derive(Clone, Copy)]
pub struct Extractor<'a> {
    k: usize,
    markers: Option<&'a dyn MarkerClassifier>,
    bounds: ValueBounds,
}

impl<'a> Extractor<'a> {
    /// Create an extractor; without `markers` every k-mer is kept with value 0
    pub fn new(k: usize, markers: Option<&'a dyn MarkerClassifier>, bounds: ValueBounds) -> Self {
        Self { k, markers, bounds }
    }

    /// Scan one read
    pub fn extract(&self, name: &str, seq: &[u8]) -> ReadExtraction {
        let mut total_kmers = 0u64;
        let mut observations = Vec::with_capacity(match self.markers {
            Some(_) => 0,
            None => KmerStream::max_windows(seq.len(), self.k),
        });

        for hit in KmerStream::new(seq, self.k) {
            total_kmers += 1;
            let value = match self.markers {
                Some(markers) => match markers.classify(&hit.kmer, self.bounds) {
                    Some(value) => value,
                    None => continue,
                },
                None => 0,
            };
            observations.push(KmerObservation {
                kmer: hit.kmer,
                position: hit.position,
                orientation: hit.orientation,
                value,
            });
        }

        ReadExtraction {
            name: name.to_string(),
            total_kmers,
            observations,
        }
    }
}
