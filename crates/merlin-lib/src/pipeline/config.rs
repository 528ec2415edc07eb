//! Run configuration for graph construction
//!
//! One plain struct carries every run parameter and is passed explicitly to
//! the components that need it.

use std::path::PathBuf;
use thiserror::Error;

use crate::constants::{
    is_valid_k, BYTES_PER_INFLIGHT_BASE, DEFAULT_K, DEFAULT_MAX_MEMORY_GIB, GIB,
    INFLIGHT_MEMORY_DIVISOR, MIN_BATCH_BASES,
};
use crate::markers::ValueBounds;

/// Invalid run parameters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// K-mer width outside the supported range
    #[error("k must be in range [1, 32], got k={0}")]
    KmerSize(usize),
    /// Empty value bound
    #[error("minimum value {min} exceeds maximum value {max}")]
    ValueBounds {
        /// Configured minimum
        min: u64,
        /// Configured maximum
        max: u64,
    },
    /// Memory budget of zero
    #[error("memory budget must be at least 1 GiB")]
    Memory,
    /// No sequence input
    #[error("no sequence input given")]
    MissingSequence,
}

/// Configuration parameters for one graph-building run
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    /// K-mer length (1 to 32)
    pub k: usize,

    /// Number of worker threads (0 = all available cores)
    pub threads: usize,

    /// Memory budget in GiB, bounding in-flight read batches
    pub max_memory_gib: usize,

    /// Smallest accepted marker value (inclusive)
    pub min_value: u64,

    /// Largest accepted marker value (inclusive)
    pub max_value: u64,

    /// FASTA/FASTQ input, optionally gzipped
    pub sequence_path: PathBuf,

    /// Marker table restricting which k-mers become nodes
    pub marker_path: Option<PathBuf>,

    /// Haplotype A marker table
    pub hap_a_path: Option<PathBuf>,

    /// Haplotype B marker table
    pub hap_b_path: Option<PathBuf>,

    /// Output prefix for `<prefix>.gfa` and `<prefix>.csv`
    pub output_prefix: PathBuf,

    /// Gzip-compress outputs
    pub compress: bool,

    /// Verbose per-read logging
    pub debug: bool,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            threads: 0,
            max_memory_gib: DEFAULT_MAX_MEMORY_GIB,
            min_value: 0,
            max_value: u64::MAX,
            sequence_path: PathBuf::new(),
            marker_path: None,
            hap_a_path: None,
            hap_b_path: None,
            output_prefix: PathBuf::from("merlin"),
            compress: false,
            debug: false,
        }
    }
}

impl RunConfiguration {
    /// Configuration for a sequence file with the given k, other fields defaulted
    pub fn new(k: usize, sequence_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config = Self {
            k,
            sequence_path: sequence_path.into(),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_k(self.k) {
            return Err(ConfigError::KmerSize(self.k));
        }
        if self.min_value > self.max_value {
            return Err(ConfigError::ValueBounds {
                min: self.min_value,
                max: self.max_value,
            });
        }
        if self.max_memory_gib == 0 {
            return Err(ConfigError::Memory);
        }
        if self.sequence_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingSequence);
        }
        Ok(())
    }

    /// The `[min_value, max_value]` marker bound
    pub fn bounds(&self) -> ValueBounds {
        ValueBounds::new(self.min_value, self.max_value)
    }

    /// Bases of raw sequence to read per batch
    pub fn batch_bases(&self) -> usize {
        let budget = self.max_memory_gib.saturating_mul(GIB) / INFLIGHT_MEMORY_DIVISOR;
        (budget / BYTES_PER_INFLIGHT_BASE).max(MIN_BATCH_BASES)
    }

    /// Log configuration parameters via tracing
    pub fn print(&self) {
        tracing::info!("Run Configuration:");
        tracing::info!("  k = {}", self.k);
        if self.threads == 0 {
            tracing::info!("  threads = all available cores");
        } else {
            tracing::info!("  threads = {}", self.threads);
        }
        tracing::info!("  max_memory_gib = {}", self.max_memory_gib);
        tracing::info!("  value bounds = [{}, {}]", self.min_value, self.max_value);
        tracing::info!("  sequence = {}", self.sequence_path.display());
        if let Some(path) = &self.marker_path {
            tracing::info!("  markers = {}", path.display());
        }
        if let Some(path) = &self.hap_a_path {
            tracing::info!("  hap-A = {}", path.display());
        }
        if let Some(path) = &self.hap_b_path {
            tracing::info!("  hap-B = {}", path.display());
        }
        tracing::info!("  output prefix = {}", self.output_prefix.display());
        tracing::debug!("  compress = {}", self.compress);
        tracing::debug!("  debug = {}", self.debug);
    }
}
