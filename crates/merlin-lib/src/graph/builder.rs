//! Turns extracted reads into graph mutations
//!
//! Each read becomes a path through the graph: consecutive kept k-mers are
//! joined by an edge carrying the strand each k-mer was seen on. Walking the
//! same adjacency in another read adds to the edge's weight. Kept k-mers that
//! start one base apart overlap by `k - 1` bases; filtered windows or invalid
//! bases between them leave a gap instead.

use tracing::debug;

use super::store::{GraphStore, NodeId};
use crate::kmer::Orientation;
use crate::pipeline::extract::{KmerObservation, ReadExtraction};

/// Counters accumulated while merging reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Reads merged
    pub reads: u64,
    /// K-mer windows scanned across merged reads
    pub kmers_scanned: u64,
    /// K-mers that became (or hit) nodes
    pub kmers_kept: u64,
    /// Edge observations recorded
    pub edge_observations: u64,
}

/// Single writer over a [`GraphStore`]
pub struct GraphBuilder<'g> {
    store: &'g mut GraphStore,
    stats: MergeStats,
}

impl<'g> GraphBuilder<'g> {
    /// Borrow the store exclusively for building
    pub fn new(store: &'g mut GraphStore) -> Self {
        Self {
            store,
            stats: MergeStats::default(),
        }
    }

    /// Merge one read's observations
    pub fn add_read(&mut self, read: &ReadExtraction) {
        self.stats.reads += 1;
        self.stats.kmers_scanned += read.total_kmers;

        let edges = self.add_path(read.observations.iter().copied());
        debug!(
            "merged {}: {} of {} k-mers, {} edges",
            read.name,
            read.observations.len(),
            read.total_kmers,
            edges
        );
    }

    /// Merge a path of observations in read order; returns the edges recorded
    pub fn add_path<I>(&mut self, steps: I) -> u64
    where
        I: IntoIterator<Item = KmerObservation>,
    {
        let mut previous: Option<(NodeId, Orientation, usize)> = None;
        let mut edges = 0u64;

        for obs in steps {
            let node = self.store.get_or_create_node_with_value(obs.kmer, obs.value);
            self.stats.kmers_kept += 1;

            if let Some((prev_node, prev_orientation, prev_position)) = previous {
                let overlapping = obs.position == prev_position + 1;
                self.store.add_or_merge_edge_with_overlap(
                    prev_node,
                    prev_orientation,
                    node,
                    obs.orientation,
                    overlapping,
                );
                edges += 1;
            }
            previous = Some((node, obs.orientation, obs.position));
        }

        self.stats.edge_observations += edges;
        edges
    }

    /// Counters so far
    pub fn stats(&self) -> MergeStats {
        self.stats
    }

    /// The store being built
    pub fn store(&self) -> &GraphStore {
        &*self.store
    }
}
