//! Linkage graph (GFA 1.0) and tabular node summary output
//!
//! Both files list nodes by ascending canonical k-mer, so output depends only
//! on graph content. Edges are grouped under their origin node, forward-strand
//! edges first, each group sorted by target k-mer then target strand.
//!
//! ```text
//! H   VN:Z:1.0
//! S   <kmer>  *  LN:i:<k>  CL:z:<color>
//! L   <from>  <+|->  <to>  <+|->  <k-1>M|*  RC:i:<weight>
//! ```
//!
//! The overlap is `<k-1>M` for k-mers seen as consecutive windows and `*` for
//! k-mers linked across a gap in the read.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::store::{EdgeId, GraphStore};
use crate::constants::{CSV_HEADER, GFA_HEADER};
use crate::kmer::Orientation;
use crate::output::{output_path, OutputWriter};

/// Paths written by [`GraphExporter::export`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    /// Linkage graph
    pub gfa: PathBuf,
    /// Node summary
    pub csv: PathBuf,
}

/// Serializes a finished graph
#[derive(Debug, Clone, Copy)]
pub struct GraphExporter {
    k: usize,
    compress: bool,
}

impl GraphExporter {
    /// Exporter for a graph of `k`-mers
    pub fn new(k: usize, compress: bool) -> Self {
        Self { k, compress }
    }

    /// Write `<prefix>.gfa` and `<prefix>.csv` (plus `.gz` when compressing)
    ///
    /// Either both files are written or neither is left behind.
    pub fn export(&self, store: &GraphStore, prefix: &Path) -> Result<ExportPaths> {
        let paths = ExportPaths {
            gfa: output_path(prefix, "gfa", self.compress),
            csv: output_path(prefix, "csv", self.compress),
        };

        info!("Writing linkage graph to {}", paths.gfa.display());
        write_output(&paths.gfa, |out| self.write_gfa(store, out))?;

        info!("Writing node summary to {}", paths.csv.display());
        if let Err(e) = write_output(&paths.csv, |out| self.write_csv(store, out)) {
            discard(&paths.gfa);
            return Err(e);
        }

        Ok(paths)
    }

    /// Write the linkage graph
    pub fn write_gfa<W: Write>(&self, store: &GraphStore, out: &mut W) -> Result<()> {
        writeln!(out, "{}", GFA_HEADER)?;

        let order = store.sorted_node_ids();
        for &id in &order {
            let node = store.node(id);
            writeln!(out, "S\t{}\t*\tLN:i:{}\tCL:z:{}", node.kmer(), self.k, node.color)?;
        }

        let overlap_cigar = format!("{}M", self.k.saturating_sub(1));
        let mut group: Vec<EdgeId> = Vec::new();
        for &id in &order {
            for orientation in [Orientation::Forward, Orientation::Reverse] {
                group.clear();
                group.extend_from_slice(store.outgoing(id, orientation));
                group.sort_unstable_by_key(|&eid| {
                    let edge = store.edge(eid);
                    (store.node(edge.to).kmer(), edge.orient_to)
                });

                for &eid in &group {
                    let edge = store.edge(eid);
                    let overlap = if edge.overlapping { overlap_cigar.as_str() } else { "*" };
                    writeln!(
                        out,
                        "L\t{}\t{}\t{}\t{}\t{}\tRC:i:{}",
                        store.node(edge.from).kmer(),
                        edge.orient_from.sign(),
                        store.node(edge.to).kmer(),
                        edge.orient_to.sign(),
                        overlap,
                        edge.weight
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Write the `Name,Value,Color` node summary
    pub fn write_csv<W: Write>(&self, store: &GraphStore, out: &mut W) -> Result<()> {
        writeln!(out, "{}", CSV_HEADER)?;
        for id in store.sorted_node_ids() {
            let node = store.node(id);
            writeln!(out, "{},{},{}", node.kmer(), node.value, node.color)?;
        }
        Ok(())
    }
}

/// Create `path`, fill it with `write` and flush it; a failed file is removed
fn write_output<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut OutputWriter) -> Result<()>,
{
    let mut out = OutputWriter::create(path)?;
    let written = write(&mut out).and_then(|()| out.finish().map_err(Into::into));
    if written.is_err() {
        discard(path);
    }
    written.with_context(|| format!("Failed to write {}", path.display()))
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("Failed to remove partial output {}: {}", path.display(), e);
    }
}
