//! FASTA/FASTQ reading with automatic decompression
//!
//! Reads are handed out in owned batches so they can be scanned on worker
//! threads while the next batch is read.

use anyhow::{Context, Result};
use needletail::errors::ParseErrorKind;
use needletail::parse_fastx_file;
use std::path::Path;
use tracing::warn;

/// One input read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Read name (the header up to the end of line)
    pub name: String,
    /// Bases as stored in the file
    pub seq: Vec<u8>,
}

/// Parse a FASTA/FASTQ file and call `callback` with batches of reads
///
/// A batch is closed once it holds at least `batch_bases` bases, so every
/// batch except possibly the last is at least that large and no batch is
/// larger than that plus one read.
///
/// # Errors
/// Returns an error if the file cannot be opened, a record is malformed, or
/// the callback fails.
pub fn parse_sequence_batches<P, F>(path: P, batch_bases: usize, mut callback: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(Vec<SequenceRecord>) -> Result<()>,
{
    let path = path.as_ref();

    // needletail automatically handles gzip decompression
    let mut reader = match parse_fastx_file(path) {
        Ok(reader) => reader,
        Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => {
            warn!("Sequence file {} is empty", path.display());
            return Ok(());
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to open sequence file: {}", path.display()))
        }
    };

    let mut batch = Vec::new();
    let mut bases = 0usize;

    while let Some(record) = reader.next() {
        let record = record
            .with_context(|| format!("Failed to parse sequence record in {}", path.display()))?;

        let seq = record.seq().into_owned();
        bases += seq.len();
        batch.push(SequenceRecord {
            name: String::from_utf8_lossy(record.id()).into_owned(),
            seq,
        });

        if bases >= batch_bases {
            callback(std::mem::take(&mut batch))?;
            bases = 0;
        }
    }

    if !batch.is_empty() {
        callback(batch)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fasta(records: &[(&str, &str)]) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        for (name, seq) in records {
            writeln!(file, ">{}", name)?;
            writeln!(file, "{}", seq)?;
        }
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_parse_fasta_file() -> Result<()> {
        let file = fasta(&[("seq1", "ACGT"), ("seq2", "TGCANN")])?;

        let mut sequences = Vec::new();
        parse_sequence_batches(file.path(), usize::MAX, |batch| {
            sequences.extend(batch);
            Ok(())
        })?;

        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].name, "seq1");
        assert_eq!(sequences[0].seq, b"ACGT");
        assert_eq!(sequences[1].name, "seq2");
        assert_eq!(sequences[1].seq, b"TGCANN");
        Ok(())
    }

    #[test]
    fn test_batches_respect_base_budget() -> Result<()> {
        let file = fasta(&[("a", "ACGT"), ("b", "ACGT"), ("c", "ACGTACGT"), ("d", "AC")])?;

        let mut sizes = Vec::new();
        parse_sequence_batches(file.path(), 8, |batch| {
            sizes.push(batch.iter().map(|r| r.name.clone()).collect::<Vec<_>>());
            Ok(())
        })?;

        assert_eq!(
            sizes,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string()],
                vec!["d".to_string()],
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parse_fastq_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "@read1")?;
        writeln!(file, "AAAACCCC")?;
        writeln!(file, "+")?;
        writeln!(file, "IIIIIIII")?;
        file.flush()?;

        let mut count = 0;
        parse_sequence_batches(file.path(), 1, |batch| {
            count += batch.len();
            assert_eq!(batch[0].seq, b"AAAACCCC");
            Ok(())
        })?;
        assert_eq!(count, 1);
        Ok(())
    }

    #[test]
    fn test_empty_file_yields_no_batches() -> Result<()> {
        let file = NamedTempFile::new()?;
        let mut calls = 0;
        parse_sequence_batches(file.path(), 1, |_| {
            calls += 1;
            Ok(())
        })?;
        assert_eq!(calls, 0);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = parse_sequence_batches("/nonexistent/reads.fa", 1, |_| Ok(())).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/reads.fa"));
    }

    #[test]
    fn test_callback_error_propagates() -> Result<()> {
        let file = fasta(&[("a", "ACGT")])?;
        let result = parse_sequence_batches(file.path(), 1, |_| anyhow::bail!("stop"));
        assert!(result.is_err());
        Ok(())
    }
}
