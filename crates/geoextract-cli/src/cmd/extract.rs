//! Extract subcommand - write one GeoJSON file per enabled DAWA dataset

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::Args;
use geoextract_core::{Cancellation, ErrorKind, SharedProgress};
use geoextract_dawa::{Dataset, DatasetConfig, DawaClient, RunState, RunSummary};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Output directory (overrides out_dir_path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only extract these datasets, comma separated (overrides [dawa.datasets])
    #[arg(short, long, value_delimiter = ',', value_parser = parse_dataset)]
    pub dataset: Vec<Dataset>,
}

fn parse_dataset(s: &str) -> Result<Dataset, String> {
    Dataset::from_name(s).ok_or_else(|| {
        let known: Vec<&str> = Dataset::all().iter().map(|d| d.name()).collect();
        format!("unknown dataset {s:?} (expected one of: {})", known.join(", "))
    })
}

pub fn run(args: ExtractArgs, config: &Config, progress: &SharedProgress) -> Result<ExitCode> {
    let mut run_config = config.run_config();
    if let Some(output) = args.output {
        run_config.out_dir_path = output;
    }
    if !args.dataset.is_empty() {
        run_config.datasets = DatasetConfig::only(&args.dataset);
    }

    let cancel = Cancellation::new();
    setup_signal_handler(&cancel)?;

    let client =
        DawaClient::new(&run_config.base_url, &run_config.http).context("Cannot build HTTP client")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Cannot start async runtime")?;

    let result = runtime.block_on(geoextract_dawa::run(&run_config, &client, progress, &cancel));

    match result {
        Ok(summary) => {
            report(&summary, progress);
            Ok(match summary.state {
                RunState::Cancelled => {
                    log::warn!("Cancelled; completed files are intact, the last one may be partial");
                    ExitCode::from(130)
                }
                _ => ExitCode::SUCCESS,
            })
        }
        Err(e) => {
            if !e.completed.is_empty() {
                report(&e.summary(), progress);
            }
            log::error!("Run failed: {e}");
            Ok(match e.kind() {
                ErrorKind::Configuration => ExitCode::from(2),
                _ => ExitCode::from(1),
            })
        }
    }
}

fn report(summary: &RunSummary, progress: &SharedProgress) {
    if summary.state == RunState::NoWork {
        return;
    }
    if progress.is_tty() {
        progress.println(summary.format_table());
    } else {
        summary.log();
    }
}

/// First signal: request graceful cancellation.
/// Second signal: exit immediately with 130.
fn setup_signal_handler(cancel: &Cancellation) -> Result<()> {
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        let flag = cancel.flag();
        // SAFETY: AtomicBool::swap and process::exit are async-signal-safe
        unsafe {
            signal_hook::low_level::register(signal, move || {
                if flag.swap(true, Ordering::Relaxed) {
                    std::process::exit(130);
                }
            })
        }
        .with_context(|| format!("Failed to register handler for signal {signal}"))?;
    }
    Ok(())
}
