//! geoextract - Danish address data (DAWA) to newline-delimited GeoJSON
//!
//! Reads every enabled dataset at one DAWA transaction and writes one
//! `<dataset>.geojson` file per dataset.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use geoextract_core::{ProgressContext, Verbosity};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "geoextract")]
#[command(about = "Extract DAWA address datasets to newline-delimited GeoJSON")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./geoextract.toml or ~/.config/geoextract/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract enabled datasets at the latest transaction
    Extract(cmd::extract::ExtractArgs),
    /// List known datasets and whether they are enabled
    Datasets,
    /// Show current configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(ProgressContext::new());

    // Logging:
    //   TTY:     warn unless --debug, progress bars show activity
    //   non-TTY: info unless --debug, logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let verbosity = Verbosity::from_flags(is_tty, cli.debug);
    if let Err(e) = geoextract_core::init_logging(verbosity, multi) {
        eprintln!("Cannot initialize logging: {e}");
    }

    let config = match cli.config {
        Some(path) => Config::from_file(&path),
        None => Config::load(),
    };
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            log::error!("Configuration error: {e:#}");
            return ExitCode::from(2);
        }
    };

    let result = match cli.command {
        Command::Extract(args) => cmd::extract::run(args, &config, &progress),
        Command::Datasets => {
            cmd::datasets::run(&config);
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => {
            print_config(&config);
            Ok(ExitCode::SUCCESS)
        }
    };

    result.unwrap_or_else(|e| {
        log::error!("Fatal error: {e:#}");
        ExitCode::from(1)
    })
}

fn print_config(config: &Config) {
    use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    let enabled: Vec<&str> = config
        .dawa
        .datasets
        .select_enabled()
        .iter()
        .map(|d| d.name())
        .collect();

    table.add_row(vec![
        "Output directory",
        &config.out_dir_path.display().to_string(),
    ]);
    table.add_row(vec!["DAWA base URL", &config.dawa.base_url]);
    table.add_row(vec![
        "Datasets",
        &if enabled.is_empty() {
            "none".to_string()
        } else {
            enabled.join(", ")
        },
    ]);
    table.add_row(vec![
        "On mapping error",
        &config.dawa.on_mapping_error.to_string(),
    ]);
    table.add_row(vec![
        "Connect timeout",
        &format!("{}s", config.http.connect_timeout),
    ]);
    table.add_row(vec![
        "Read timeout",
        &format!("{}s", config.http.read_timeout),
    ]);

    eprintln!("\n{table}");
}
