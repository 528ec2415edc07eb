//! Output file handles with optional gzip compression

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::constants::GZIP_SUFFIX;

/// Buffered file writer, gzip-encoded when the path ends in `.gz`
pub enum OutputWriter {
    /// Uncompressed output
    Plain(BufWriter<File>),
    /// Gzip-compressed output
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputWriter {
    /// Create (truncate) the file at `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        let inner = BufWriter::new(file);
        if path.to_string_lossy().ends_with(GZIP_SUFFIX) {
            Ok(OutputWriter::Gzip(GzEncoder::new(inner, Compression::default())))
        } else {
            Ok(OutputWriter::Plain(inner))
        }
    }

    /// Flush everything, writing the gzip trailer if compressed
    pub fn finish(self) -> io::Result<()> {
        match self {
            OutputWriter::Plain(mut w) => w.flush(),
            OutputWriter::Gzip(w) => w.finish()?.flush(),
        }
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputWriter::Plain(w) => w.write(buf),
            OutputWriter::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputWriter::Plain(w) => w.flush(),
            OutputWriter::Gzip(w) => w.flush(),
        }
    }
}

/// `<prefix>.<extension>`, with `.gz` appended when compressing
pub fn output_path(prefix: &Path, extension: &str, compress: bool) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    if compress {
        name.push(GZIP_SUFFIX);
    }
    PathBuf::from(name)
}
