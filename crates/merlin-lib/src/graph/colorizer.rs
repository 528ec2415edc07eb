//! Haplotype coloring of graph nodes
//!
//! After all reads are merged every node is classified by whether its k-mer
//! is a marker in the haplotype A table, the haplotype B table, both, or
//! neither. Values outside the run's bound count as absent.

use std::fmt;
use tracing::info;

use super::store::{GraphStore, NodeId};
use crate::kmer::Kmer;
use crate::markers::{MarkerClassifier, ValueBounds};

/// Haplotype classification of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeColor {
    /// Not a marker of either haplotype
    #[default]
    Unknown,
    /// Haplotype A marker only
    HapA,
    /// Haplotype B marker only
    HapB,
    /// Marker of both haplotypes
    Shared,
}

impl NodeColor {
    /// Classify from table membership
    #[inline]
    pub const fn from_presence(in_hap_a: bool, in_hap_b: bool) -> Self {
        match (in_hap_a, in_hap_b) {
            (true, false) => NodeColor::HapA,
            (false, true) => NodeColor::HapB,
            (true, true) => NodeColor::Shared,
            (false, false) => NodeColor::Unknown,
        }
    }

    /// Hex color used in graph and summary output
    pub const fn hex(self) -> &'static str {
        match self {
            NodeColor::Unknown => "#AAAAAA",
            NodeColor::HapA => "#FF0000",
            NodeColor::HapB => "#0000FF",
            NodeColor::Shared => "#800080",
        }
    }
}

impl fmt::Display for NodeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

/// Number of nodes of each color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCounts {
    /// Unclassified nodes
    pub unknown: usize,
    /// Haplotype A nodes
    pub hap_a: usize,
    /// Haplotype B nodes
    pub hap_b: usize,
    /// Nodes marked by both haplotypes
    pub shared: usize,
}

impl ColorCounts {
    fn add(&mut self, color: NodeColor) {
        match color {
            NodeColor::Unknown => self.unknown += 1,
            NodeColor::HapA => self.hap_a += 1,
            NodeColor::HapB => self.hap_b += 1,
            NodeColor::Shared => self.shared += 1,
        }
    }

    /// Total nodes counted
    pub fn total(&self) -> usize {
        self.unknown + self.hap_a + self.hap_b + self.shared
    }
}

/// Assigns [`NodeColor`]s from two optional haplotype tables
pub struct GraphColorizer<'a> {
    hap_a: Option<&'a dyn MarkerClassifier>,
    hap_b: Option<&'a dyn MarkerClassifier>,
    bounds: ValueBounds,
}

impl<'a> GraphColorizer<'a> {
    /// Create a colorizer; a missing table marks nothing
    pub fn new(
        hap_a: Option<&'a dyn MarkerClassifier>,
        hap_b: Option<&'a dyn MarkerClassifier>,
        bounds: ValueBounds,
    ) -> Self {
        Self { hap_a, hap_b, bounds }
    }

    fn present(table: Option<&dyn MarkerClassifier>, kmer: &Kmer, bounds: ValueBounds) -> bool {
        table.is_some_and(|t| t.is_marker(kmer, bounds))
    }

    /// Color every node; earlier colors are overwritten, so reruns are idempotent
    pub fn colorize(&self, store: &mut GraphStore) -> ColorCounts {
        let mut counts = ColorCounts::default();
        let ids: Vec<NodeId> = store.node_ids().collect();
        for id in ids {
            let kmer = store.node(id).kmer();
            let color = NodeColor::from_presence(
                Self::present(self.hap_a, &kmer, self.bounds),
                Self::present(self.hap_b, &kmer, self.bounds),
            );
            store.set_color(id, color);
            counts.add(color);
        }

        info!(
            "Colored {} nodes: {} hap-A, {} hap-B, {} shared, {} unknown",
            counts.total(),
            counts.hap_a,
            counts.hap_b,
            counts.shared,
            counts.unknown
        );
        counts
    }
}
