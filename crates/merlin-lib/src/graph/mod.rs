//! The k-mer linkage graph
//!
//! - [`store`]: arena of nodes and weighted edges keyed by canonical k-mer
//! - [`builder`]: turns extracted reads into node and edge observations
//! - [`colorizer`]: haplotype classification of nodes
//! - [`export`]: GFA and CSV serialization

pub mod builder;
pub mod colorizer;
pub mod export;
pub mod store;

pub use builder::{GraphBuilder, MergeStats};
pub use colorizer::{ColorCounts, GraphColorizer, NodeColor};
pub use export::{ExportPaths, GraphExporter};
pub use store::{Edge, EdgeId, GraphStore, Node, NodeId};
