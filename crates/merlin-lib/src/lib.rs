// merlin: haplotype-colored k-mer linkage graphs
//
// Builds a graph of canonical k-mers linked by read adjacency, colors nodes
// by haplotype marker membership and writes GFA plus a CSV node summary.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod constants;
pub mod encoding;
pub mod graph;
pub mod kmer;
pub mod kmer_stream;
pub mod markers;
pub mod output;
pub mod pipeline;

// Re-export common types at crate root
pub use graph::{
    ColorCounts, Edge, EdgeId, ExportPaths, GraphBuilder, GraphColorizer, GraphExporter,
    GraphStore, Node, NodeColor, NodeId,
};
pub use kmer::{Kmer, Orientation};
pub use kmer_stream::{KmerHit, KmerStream};
pub use markers::{MarkerClassifier, MarkerTable, ValueBounds};
pub use pipeline::{ConfigError, GraphPipeline, RunConfiguration, RunStats};

/// Version information
pub fn version() -> (u8, u8, u8) {
    constants::VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let (major, minor, patch) = version();
        assert_eq!(major, 0);
        assert_eq!(minor, 1);
        assert_eq!(patch, 0);
    }
}
