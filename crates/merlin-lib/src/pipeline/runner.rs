//! Parallel extraction feeding a single merge stage
//!
//! ```text
//! reader ──batch──▶ rayon pool (extract reads) ──ReadExtraction──▶ merge thread
//!                                                  bounded channel    owns GraphStore
//! ```
//!
//! Workers only touch read-local data. The merge thread is the sole owner of
//! the [`GraphStore`] until it is joined, so there is exactly one writer and
//! no lock around graph mutation. Joining the merge thread is the barrier
//! between building and the coloring/export passes.

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use std::sync::mpsc::{sync_channel, Receiver};
use std::thread;
use tracing::{debug, info};

use super::config::RunConfiguration;
use super::extract::{Extractor, ReadExtraction};
use super::parse::{parse_sequence_batches, SequenceRecord};
use crate::constants::MERGE_QUEUE_DEPTH_PER_THREAD;
use crate::graph::{GraphBuilder, GraphStore, MergeStats};
use crate::markers::MarkerClassifier;

/// Summary of a finished merge stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Reads merged
    pub reads: u64,
    /// K-mer windows scanned
    pub kmers_scanned: u64,
    /// K-mers kept for the graph
    pub kmers_kept: u64,
    /// Distinct nodes
    pub nodes: usize,
    /// Distinct edges
    pub edges: usize,
    /// Sum of edge weights
    pub total_edge_weight: u64,
}

impl RunStats {
    fn new(merge: MergeStats, store: &GraphStore) -> Self {
        Self {
            reads: merge.reads,
            kmers_scanned: merge.kmers_scanned,
            kmers_kept: merge.kmers_kept,
            nodes: store.num_nodes(),
            edges: store.num_edges(),
            total_edge_weight: store.total_edge_weight(),
        }
    }

    /// Log the statistics via tracing
    pub fn print(&self) {
        info!("Graph Build Complete");
        info!("  reads = {}", self.reads);
        info!("  k-mers scanned = {}", self.kmers_scanned);
        info!("  k-mers kept = {}", self.kmers_kept);
        info!("  nodes = {}", self.nodes);
        info!("  edges = {}", self.edges);
        info!("  total edge weight = {}", self.total_edge_weight);
    }
}

/// Builds the linkage graph from a sequence file
pub struct GraphPipeline<'a> {
    config: &'a RunConfiguration,
    markers: Option<&'a dyn MarkerClassifier>,
}

impl<'a> GraphPipeline<'a> {
    /// Create a pipeline; `markers` restricts which k-mers become nodes
    pub fn new(
        config: &'a RunConfiguration,
        markers: Option<&'a dyn MarkerClassifier>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, markers })
    }

    /// Read the sequence file and build the graph
    ///
    /// # Parallelism
    /// The number of extraction threads is controlled by `config.threads`:
    /// - `0`: use all available CPU cores (rayon default)
    /// - `N`: use exactly N threads
    ///
    /// Merging always happens on one dedicated thread.
    pub fn run(&self) -> Result<(GraphStore, RunStats)> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
            .context("Failed to create thread pool")?;
        let num_threads = pool.current_num_threads();
        let batch_bases = self.config.batch_bases();
        info!(
            "Building graph with {} extraction threads, {} bases per batch",
            num_threads, batch_bases
        );

        let extractor = Extractor::new(self.config.k, self.markers, self.config.bounds());
        let (tx, rx) = sync_channel::<ReadExtraction>(num_threads * MERGE_QUEUE_DEPTH_PER_THREAD);

        thread::scope(|scope| {
            let merger = scope.spawn(move || merge_stage(rx));

            let produced = parse_sequence_batches(&self.config.sequence_path, batch_bases, |batch| {
                debug!("Extracting batch of {} reads", batch.len());
                pool.install(|| extract_batch(&extractor, batch, &tx))
            });
            // Closing the channel lets the merge stage drain and finish.
            drop(tx);

            let merged = merger
                .join()
                .map_err(|_| anyhow!("Merge stage panicked"))?;
            produced?;

            let (store, stats) = merged;
            let stats = RunStats::new(stats, &store);
            stats.print();
            Ok((store, stats))
        })
    }
}

/// Extract every read of a batch in parallel and queue the results for merging
fn extract_batch(
    extractor: &Extractor<'_>,
    batch: Vec<SequenceRecord>,
    tx: &std::sync::mpsc::SyncSender<ReadExtraction>,
) -> Result<()> {
    batch
        .into_par_iter()
        .map(|record| extractor.extract(&record.name, &record.seq))
        .try_for_each_with(tx.clone(), |tx, extraction| tx.send(extraction))
        .map_err(|_| anyhow!("Merge stage stopped before all reads were queued"))
}

/// The single writer: owns the graph and applies every extraction in turn
fn merge_stage(rx: Receiver<ReadExtraction>) -> (GraphStore, MergeStats) {
    let mut store = GraphStore::new();
    let mut builder = GraphBuilder::new(&mut store);
    for extraction in rx {
        builder.add_read(&extraction);
    }
    let stats = builder.stats();
    (store, stats)
}
