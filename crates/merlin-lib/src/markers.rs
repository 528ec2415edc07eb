//! Haplotype marker tables
//!
//! A marker table maps canonical k-mers to an integer value (typically a
//! count). Tables are loaded from text dumps with one `KMER VALUE` record per
//! line, as written by `meryl print`, optionally gzip-compressed.
//!
//! All lookups go through [`MarkerClassifier`], which applies the run's
//! inclusive `[min, max]` value bound: a value outside the bound is treated
//! exactly like an absent k-mer.

use ahash::AHashMap;
use anyhow::{bail, Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::constants::GZIP_SUFFIX;
use crate::kmer::Kmer;

/// Inclusive bound on classification values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueBounds {
    /// Smallest accepted value
    pub min: u64,
    /// Largest accepted value
    pub max: u64,
}

impl ValueBounds {
    /// Create a bound; `min > max` yields a bound nothing satisfies
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the bound
    #[inline]
    pub const fn contains(&self, value: u64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ValueBounds {
    fn default() -> Self {
        Self::new(0, u64::MAX)
    }
}

/// Exact-match classification of k-mers
pub trait MarkerClassifier: Send + Sync {
    /// Raw value stored for a k-mer, if present; the k-mer is canonicalised first
    fn lookup(&self, kmer: &Kmer) -> Option<u64>;

    /// Value for a k-mer if present and within `bounds`
    #[inline]
    fn classify(&self, kmer: &Kmer, bounds: ValueBounds) -> Option<u64> {
        self.lookup(kmer).filter(|&value| bounds.contains(value))
    }

    /// Whether the k-mer counts as present under `bounds`
    #[inline]
    fn is_marker(&self, kmer: &Kmer, bounds: ValueBounds) -> bool {
        self.classify(kmer, bounds).is_some()
    }
}

/// In-memory marker table keyed by canonical k-mer
#[derive(Debug, Clone, Default)]
pub struct MarkerTable {
    name: String,
    k: usize,
    values: AHashMap<Kmer, u64>,
}

impl MarkerTable {
    /// Create an empty table for k-mers of width `k`
    pub fn new(name: impl Into<String>, k: usize) -> Self {
        Self {
            name: name.into(),
            k,
            values: AHashMap::new(),
        }
    }

    /// Build a table from (k-mer, value) pairs; later pairs overwrite earlier ones
    pub fn from_pairs<I>(name: impl Into<String>, k: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (Kmer, u64)>,
    {
        let mut table = Self::new(name, k);
        for (kmer, value) in pairs {
            table.insert(kmer, value);
        }
        table
    }

    /// Insert or overwrite a k-mer's value
    pub fn insert(&mut self, kmer: Kmer, value: u64) {
        self.values.insert(kmer.canonical(), value);
    }

    /// Load a table from a `KMER VALUE` text dump (gzip if the path ends in `.gz`)
    ///
    /// # Errors
    /// Returns an error naming the file and line if the file cannot be read,
    /// a k-mer is not ACGT, its width differs from `k`, or a value is not an
    /// unsigned integer.
    pub fn load<P: AsRef<Path>>(path: P, k: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open marker table: {}", path.display()))?;

        let reader: Box<dyn Read> = if path.to_string_lossy().ends_with(GZIP_SUFFIX) {
            Box::new(MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let mut table = Self::new(path.display().to_string(), k);
        table.read_records(BufReader::new(reader))?;

        info!("Loaded {} markers from {}", table.len(), path.display());
        Ok(table)
    }

    fn read_records<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line
                .with_context(|| format!("Failed to read {} at line {}", self.name, line_no))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(kmer_str), Some(value_str)) = (fields.next(), fields.next()) else {
                bail!("Malformed record in {} at line {}: {:?}", self.name, line_no, line);
            };

            let kmer = Kmer::from_str_with_k(kmer_str, self.k).with_context(|| {
                format!("Invalid k-mer in {} at line {}", self.name, line_no)
            })?;
            let value: u64 = value_str.parse().with_context(|| {
                format!("Invalid value {:?} in {} at line {}", value_str, self.name, line_no)
            })?;

            self.insert(kmer, value);
        }
        debug!("{}: {} distinct canonical k-mers", self.name, self.values.len());
        Ok(())
    }

    /// Table name (the source path for loaded tables)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// K-mer width of the table
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of distinct canonical k-mers
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl MarkerClassifier for MarkerTable {
    #[inline]
    fn lookup(&self, kmer: &Kmer) -> Option<u64> {
        self.values.get(&kmer.canonical()).copied()
    }
}
