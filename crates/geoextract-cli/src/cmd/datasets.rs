//! Datasets subcommand - list known datasets and whether they are enabled

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use geoextract_dawa::Dataset;

use crate::config::Config;

pub fn run(config: &Config) {
    eprintln!("\n{}", format_table(config));
    for name in config.dawa.datasets.unknown_names() {
        log::warn!("Config names unknown dataset {name:?}, it will be ignored");
    }
}

fn format_table(config: &Config) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Dataset").fg(Color::Cyan),
            Cell::new("DAWA entity").fg(Color::Cyan),
            Cell::new("Enabled").fg(Color::Cyan),
            Cell::new("Output").fg(Color::Cyan),
        ]);

    for &dataset in Dataset::all() {
        let enabled = config.dawa.datasets.is_enabled(dataset);
        table.add_row(vec![
            Cell::new(dataset.name()),
            Cell::new(dataset.entity()),
            if enabled {
                Cell::new("yes").fg(Color::Green)
            } else {
                Cell::new("no").fg(Color::DarkGrey)
            },
            Cell::new(config.out_dir_path.join(dataset.file_name()).display()),
        ]);
    }
    table
}
