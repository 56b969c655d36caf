//! Run orchestration: select datasets, resolve one transaction, extract each
//! dataset in order.

use std::fmt;
use std::time::{Duration, Instant};

use geoextract_core::{
    Cancellation, ErrorKind, ExtractError, SharedProgress, WriteOptions, WriteStats, write_all,
};

use crate::api::DawaSource;
use crate::config::Config;
use crate::state::{Dataset, RunState, TransactionId};
use crate::stats::{DatasetSummary, RunSummary};
use crate::transform::{access_address, post_code, road, unit_address};

/// A failed run: the error, the dataset it happened in, and whatever was
/// completed before it.
#[derive(Debug)]
pub struct RunError {
    /// `None` when the run failed before any dataset started
    pub dataset: Option<Dataset>,
    pub error: ExtractError,
    pub transaction: Option<TransactionId>,
    pub completed: Vec<DatasetSummary>,
    /// Wall time of the whole run up to the failure
    pub elapsed: Duration,
}

impl RunError {
    fn before_datasets(error: ExtractError, start: Instant) -> Self {
        Self {
            dataset: None,
            error,
            transaction: None,
            completed: Vec::new(),
            elapsed: start.elapsed(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Summary of the failed run, for reporting what did complete
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            state: RunState::Failed,
            transaction: self.transaction,
            datasets: self.completed.clone(),
            elapsed: self.elapsed,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dataset {
            Some(d) => write!(f, "{d}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Tracks the current [`RunState`] and logs every transition
struct Tracker {
    state: RunState,
}

impl Tracker {
    fn new() -> Self {
        Self {
            state: RunState::NotStarted,
        }
    }

    fn enter(&mut self, next: RunState) {
        debug_assert!(!self.state.is_terminal(), "left terminal state {}", self.state);
        log::debug!("run: {} -> {next}", self.state);
        self.state = next;
    }

    /// Enter [`RunState::Failed`] and hand back the error to return
    fn fail(&mut self, error: RunError) -> RunError {
        self.enter(RunState::Failed);
        error
    }
}

/// Extract every enabled dataset from `source` into `config.out_dir_path`.
///
/// The latest transaction id is resolved once and shared by all datasets, so
/// the files form one consistent snapshot. Datasets are processed strictly
/// one after another. A cancelled run is not an error: the summary's state is
/// [`RunState::Cancelled`].
pub async fn run<S: DawaSource>(
    config: &Config,
    source: &S,
    progress: &SharedProgress,
    cancel: &Cancellation,
) -> Result<RunSummary, RunError> {
    run_tracked(config, source, progress, cancel, &mut Tracker::new()).await
}

async fn run_tracked<S: DawaSource>(
    config: &Config,
    source: &S,
    progress: &SharedProgress,
    cancel: &Cancellation,
    tracker: &mut Tracker,
) -> Result<RunSummary, RunError> {
    let start = Instant::now();

    if let Err(e) = config.validate() {
        return Err(tracker.fail(RunError::before_datasets(e, start)));
    }

    tracker.enter(RunState::SelectingDatasets);
    for name in config.datasets.unknown_names() {
        log::warn!("Ignoring unknown dataset {name:?}");
    }
    let selected = config.datasets.select_enabled();
    if selected.is_empty() {
        log::info!("No datasets enabled, nothing to do");
        tracker.enter(RunState::NoWork);
        return Ok(RunSummary {
            state: tracker.state,
            transaction: None,
            datasets: Vec::new(),
            elapsed: start.elapsed(),
        });
    }
    log::info!(
        "Extracting {} to {}",
        selected
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(", "),
        config.out_dir_path.display()
    );

    if let Err(e) = tokio::fs::create_dir_all(&config.out_dir_path).await {
        log::error!("Cannot create {}: {e}", config.out_dir_path.display());
        return Err(tracker.fail(RunError::before_datasets(e.into(), start)));
    }

    tracker.enter(RunState::ResolvingAnchor);
    let stage = progress.stage_line("run");
    stage.set_message("resolving latest transaction");
    let resolved = tokio::select! {
        biased;
        resolved = source.latest_transaction() => Some(resolved),
        () = cancel.cancelled() => None,
    };
    let tx = match resolved {
        Some(Ok(tx)) => tx,
        Some(Err(e)) if !cancel.is_cancelled() => {
            stage.abandon_with_message("failed to resolve transaction");
            return Err(tracker.fail(RunError::before_datasets(e.into(), start)));
        }
        // Cancelled while waiting, or the request failed because of it
        _ => {
            log::warn!("Cancelled while resolving transaction");
            tracker.enter(RunState::Cancelled);
            stage.abandon_with_message("cancelled");
            return Ok(RunSummary {
                state: tracker.state,
                transaction: None,
                datasets: Vec::new(),
                elapsed: start.elapsed(),
            });
        }
    };
    log::info!("Using transaction {tx}");

    let mut completed = Vec::with_capacity(selected.len());
    for (idx, &dataset) in selected.iter().enumerate() {
        if cancel.is_cancelled() {
            log::warn!("Cancelled before {dataset}");
            break;
        }
        tracker.enter(RunState::ProcessingDataset(dataset));
        stage.set_message(format!("{dataset} ({}/{})", idx + 1, selected.len()));
        log::info!("{dataset}: starting");

        match extract_dataset(config, source, dataset, tx, progress, cancel).await {
            Ok(stats) => {
                let summary = DatasetSummary::new(dataset, &stats);
                summary.log();
                let stopped = summary.cancelled;
                completed.push(summary);
                if stopped {
                    break;
                }
            }
            Err(error) => {
                log::error!("{dataset}: {error}");
                stage.abandon_with_message(format!("{dataset} failed"));
                return Err(tracker.fail(RunError {
                    dataset: Some(dataset),
                    error,
                    transaction: Some(tx),
                    completed,
                    elapsed: start.elapsed(),
                }));
            }
        }
    }

    let finished = completed.len() == selected.len() && !completed.iter().any(|d| d.cancelled);
    if finished {
        tracker.enter(RunState::Completed);
        stage.finish_with_message("done");
    } else {
        tracker.enter(RunState::Cancelled);
        stage.abandon_with_message("cancelled");
    }

    Ok(RunSummary {
        state: tracker.state,
        transaction: Some(tx),
        datasets: completed,
        elapsed: start.elapsed(),
    })
}


/// Bind a dataset to its record stream and mapper, then drain it to disk
async fn extract_dataset<S: DawaSource>(
    config: &Config,
    source: &S,
    dataset: Dataset,
    tx: TransactionId,
    progress: &SharedProgress,
    cancel: &Cancellation,
) -> Result<WriteStats, ExtractError> {
    let path = config.out_dir_path.join(dataset.file_name());
    let bar = progress.dataset_bar(dataset.name());
    let opts = WriteOptions {
        label: dataset.name(),
        cancel,
        on_mapping_error: config.on_mapping_error,
        progress: &bar,
    };

    let result = match dataset {
        Dataset::AccessAddress => {
            write_all(&path, source.access_addresses(tx), access_address::map, &opts).await
        }
        Dataset::UnitAddress => {
            write_all(&path, source.unit_addresses(tx), unit_address::map, &opts).await
        }
        Dataset::Road => write_all(&path, source.roads(tx), road::map, &opts).await,
        Dataset::PostCode => write_all(&path, source.post_codes(tx), post_code::map, &opts).await,
    };

    match &result {
        Ok(stats) if stats.cancelled => bar.abandon_with_message("cancelled"),
        Ok(_) => bar.finish_with_message(format!("→ {}", path.display())),
        Err(_) => bar.abandon_with_message("failed"),
    }
    result
}
