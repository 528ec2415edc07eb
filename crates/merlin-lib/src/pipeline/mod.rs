//! Graph construction pipeline
//!
//! This module implements the build steps that run before coloring:
//! 1. Read FASTA/FASTQ input in batches bounded by the memory budget
//! 2. Scan each read for canonical k-mers on a rayon pool
//! 3. Filter k-mers through the optional marker table and value bounds
//! 4. Merge every read's path into the graph on a single writer thread
//! 5. Join the writer and hand back the finished graph

pub mod config;
pub mod extract;
pub mod parse;
pub mod runner;

pub use config::{ConfigError, RunConfiguration};
pub use extract::{Extractor, KmerObservation, ReadExtraction};
pub use parse::{parse_sequence_batches, SequenceRecord};
pub use runner::{GraphPipeline, RunStats};
