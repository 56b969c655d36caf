//! Streaming writer: pull record → map → serialize → append, one at a time

use std::path::Path;
use std::time::{Duration, Instant};

use futures_util::{Stream, StreamExt};
use indicatif::ProgressBar;
use serde::Deserialize;

use crate::cancel::Cancellation;
use crate::error::{ExtractError, MappingError};
use crate::feature::GeoJsonFeature;
use crate::sink::GeoJsonSink;
use crate::stream::StreamError;

/// Progress update interval (every N records)
const UPDATE_INTERVAL: usize = 1_000;

/// What to do with a record the mapper rejects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingPolicy {
    /// Stop the dataset (and the run) at the first bad record
    #[default]
    Abort,
    /// Log and drop the record, keep going
    Skip,
}

impl std::fmt::Display for MappingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => f.write_str("abort"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

/// Per-dataset knobs for [`write_all`]
pub struct WriteOptions<'a> {
    /// Name used in log lines
    pub label: &'a str,
    pub cancel: &'a Cancellation,
    pub on_mapping_error: MappingPolicy,
    pub progress: &'a ProgressBar,
}

/// Outcome of writing one dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteStats {
    pub lines_written: usize,
    pub records_skipped: usize,
    /// Stopped early because cancellation was requested
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// Drain `records` into a newline-delimited GeoJSON file at `path`.
///
/// The file is created or truncated first. Records are pulled strictly one at
/// a time; nothing is read ahead and nothing already written is retained.
/// Cancellation is checked before every pull.
///
/// On any error the file is flushed and closed before the error is returned,
/// so it holds exactly the lines for the records processed so far.
pub async fn write_all<T, S, F>(
    path: &Path,
    records: S,
    map_fn: F,
    opts: &WriteOptions<'_>,
) -> Result<WriteStats, ExtractError>
where
    S: Stream<Item = Result<T, StreamError>>,
    F: FnMut(T) -> Result<GeoJsonFeature, MappingError>,
{
    let start = Instant::now();
    let mut sink = GeoJsonSink::create(path).await?;

    let drained = drain(&mut sink, records, map_fn, opts).await;
    opts.progress.set_position(sink.lines_written() as u64);
    let flushed = sink.finish().await;

    match (drained, flushed) {
        (Ok((lines_written, records_skipped, cancelled)), Ok(_)) => Ok(WriteStats {
            lines_written,
            records_skipped,
            cancelled,
            elapsed: start.elapsed(),
        }),
        (Ok(_), Err(e)) => Err(ExtractError::Io(e)),
        (Err(e), flushed) => {
            if let Err(flush_err) = flushed {
                log::warn!("{}: flush after error failed: {flush_err}", opts.label);
            }
            Err(e)
        }
    }
}

/// Returns (lines written, records skipped, cancelled)
async fn drain<T, S, F>(
    sink: &mut GeoJsonSink,
    records: S,
    mut map_fn: F,
    opts: &WriteOptions<'_>,
) -> Result<(usize, usize, bool), ExtractError>
where
    S: Stream<Item = Result<T, StreamError>>,
    F: FnMut(T) -> Result<GeoJsonFeature, MappingError>,
{
    let mut records = std::pin::pin!(records);
    let mut skipped = 0usize;
    let mut pulled = 0usize;

    let cancelled = |lines: usize, skipped: usize| -> Result<_, ExtractError> {
        log::warn!("{}: cancelled after {lines} records", opts.label);
        Ok((lines, skipped, true))
    };

    loop {
        if opts.cancel.is_cancelled() {
            return cancelled(sink.lines_written(), skipped);
        }

        // A pull may wait on the network; cancellation abandons it.
        let item = tokio::select! {
            biased;
            item = records.next() => item,
            () = opts.cancel.cancelled() => return cancelled(sink.lines_written(), skipped),
        };
        let Some(item) = item else {
            break;
        };
        pulled += 1;
        let record = match item {
            Ok(record) => record,
            // A read cut short by cancellation is not an upstream failure
            Err(e) if opts.cancel.is_cancelled() => {
                log::debug!("{}: pull ended by cancellation: {e}", opts.label);
                return cancelled(sink.lines_written(), skipped);
            }
            Err(e) => return Err(e.into()),
        };

        match map_fn(record) {
            Ok(feature) => sink.write_feature(&feature).await?,
            Err(e) if opts.on_mapping_error == MappingPolicy::Skip => {
                skipped += 1;
                log::warn!("{}: skipping record #{pulled}: {e}", opts.label);
            }
            Err(e) => {
                log::debug!("{}: record #{pulled} rejected by mapper", opts.label);
                return Err(ExtractError::Mapping(e));
            }
        }

        if pulled % UPDATE_INTERVAL == 0 {
            opts.progress.set_position(sink.lines_written() as u64);
        }
    }

    Ok((sink.lines_written(), skipped, false))
}
