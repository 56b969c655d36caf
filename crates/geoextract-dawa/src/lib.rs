//! Geoextract DAWA - Danish address data to newline-delimited GeoJSON
//!
//! This crate reads the DAWA replication API at a single transaction and
//! writes one `<dataset>.geojson` file per enabled dataset.

pub mod api;
pub mod config;
pub mod runner;
pub mod state;
pub mod stats;
pub mod transform;

// Re-exports
pub use api::{DEFAULT_BASE_URL, DawaClient, DawaSource, RecordStream};
pub use config::{Config, DatasetConfig};
pub use runner::{RunError, run};
pub use state::{Dataset, RunState, TransactionId};
pub use stats::{DatasetSummary, RunSummary};
