//! Newline-delimited GeoJSON file sink

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::feature::GeoJsonFeature;

/// Write buffer for the output file (64KB)
const WRITE_BUF_SIZE: usize = 64 * 1024;

/// Initial capacity for the reusable per-feature line buffer
const LINE_BUF_CAPACITY: usize = 1024;

/// Appends one serialized feature per line to a `.geojson` file.
///
/// The file is truncated on creation and written in place: whatever was
/// flushed before a failure stays on disk as a valid prefix of lines.
pub struct GeoJsonSink {
    writer: BufWriter<File>,
    path: PathBuf,
    line: Vec<u8>,
    lines_written: usize,
}

impl std::fmt::Debug for GeoJsonSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoJsonSink")
            .field("path", &self.path)
            .field("lines_written", &self.lines_written)
            .finish_non_exhaustive()
    }
}

impl GeoJsonSink {
    /// Create (or truncate) the file at `path`
    pub async fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path).await?;
        Ok(Self {
            writer: BufWriter::with_capacity(WRITE_BUF_SIZE, file),
            path: path.to_path_buf(),
            line: Vec::with_capacity(LINE_BUF_CAPACITY),
            lines_written: 0,
        })
    }

    /// Serialize and append a single feature
    pub async fn write_feature(&mut self, feature: &GeoJsonFeature) -> io::Result<()> {
        self.line.clear();
        feature
            .write_line(&mut self.line)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.writer.write_all(&self.line).await?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered lines and close the file, returning the line count.
    ///
    /// Must be called on every exit path; dropping the sink discards
    /// whatever is still buffered.
    pub async fn finish(mut self) -> io::Result<usize> {
        self.writer.flush().await?;
        self.writer.into_inner().sync_all().await?;
        Ok(self.lines_written)
    }
}
