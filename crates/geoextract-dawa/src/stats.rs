//! Per-dataset and per-run statistics, printed as a table in a TTY and
//! logged as single lines otherwise.

use std::time::Duration;

use comfy_table::{Attribute, Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use geoextract_core::{WriteStats, fmt_num};

use crate::state::{Dataset, RunState, TransactionId};

/// Outcome of one dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub dataset: Dataset,
    pub lines_written: usize,
    pub records_skipped: usize,
    /// Stopped early on cancellation; the file is a prefix
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl DatasetSummary {
    pub fn new(dataset: Dataset, stats: &WriteStats) -> Self {
        Self {
            dataset,
            lines_written: stats.lines_written,
            records_skipped: stats.records_skipped,
            cancelled: stats.cancelled,
            elapsed: stats.elapsed,
        }
    }

    pub fn log(&self) {
        let rate = if self.elapsed.as_secs_f64() > 0.0 {
            self.lines_written as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        };
        log::info!(
            "{}: {} features, {} skipped{} [{:.1}s, {:.0}/s]",
            self.dataset,
            fmt_num(self.lines_written),
            fmt_num(self.records_skipped),
            if self.cancelled { ", cancelled" } else { "" },
            self.elapsed.as_secs_f64(),
            rate
        );
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Terminal state
    pub state: RunState,
    /// Transaction every dataset was read at, once resolved
    pub transaction: Option<TransactionId>,
    pub datasets: Vec<DatasetSummary>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn lines_written(&self) -> usize {
        self.datasets.iter().map(|d| d.lines_written).sum()
    }

    pub fn records_skipped(&self) -> usize {
        self.datasets.iter().map(|d| d.records_skipped).sum()
    }

    /// Format summary table as a string.
    pub fn format_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Dataset")
                    .fg(Color::Cyan)
                    .add_attribute(Attribute::Bold),
                Cell::new("Features").fg(Color::Cyan),
                Cell::new("Skipped").fg(Color::Cyan),
                Cell::new("Time").fg(Color::Cyan),
            ]);

        for d in &self.datasets {
            let name = if d.cancelled {
                Cell::new(format!("{} (cancelled)", d.dataset)).fg(Color::Yellow)
            } else {
                Cell::new(d.dataset)
            };
            table.add_row(vec![
                name,
                Cell::new(fmt_num(d.lines_written)),
                Cell::new(fmt_num(d.records_skipped)),
                Cell::new(format!("{:.1}s", d.elapsed.as_secs_f64())),
            ]);
        }

        table.add_row(vec![
            Cell::new("Total").fg(Color::Green),
            Cell::new(fmt_num(self.lines_written())).fg(Color::Green),
            Cell::new(fmt_num(self.records_skipped())),
            Cell::new(format!("{:.1}s", self.elapsed.as_secs_f64())),
        ]);

        let tx = self
            .transaction
            .map_or_else(|| "-".to_string(), |t| t.to_string());
        format!("\nTransaction {tx} ({})\n{table}", self.state)
    }

    /// Log minimal summary (non-TTY mode).
    pub fn log(&self) {
        let tx = self
            .transaction
            .map_or_else(|| "-".to_string(), |t| t.to_string());
        log::info!(
            "Run {}: {} features in {} datasets at transaction {tx} [{:.1}s]",
            self.state,
            fmt_num(self.lines_written()),
            self.datasets.len(),
            self.elapsed.as_secs_f64()
        );
    }
}
