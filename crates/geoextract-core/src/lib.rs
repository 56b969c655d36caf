//! Geoextract Core - Common infrastructure for GeoJSON extraction pipelines
//!
//! This crate provides the source-independent pieces: NDJSON HTTP streaming,
//! the GeoJSON feature model, the memory-bounded file writer, cancellation,
//! logging and progress reporting.

pub mod cancel;
pub mod error;
pub mod feature;
pub mod logging;
pub mod progress;
pub mod sink;
pub mod stream;
pub mod writer;

// Re-exports for convenience
pub use cancel::Cancellation;
pub use error::{ErrorKind, ExtractError, MappingError};
pub use feature::{FeatureBuilder, GeoJsonFeature, Geometry, Position, Properties};
pub use logging::{IndicatifLogger, Verbosity, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use sink::GeoJsonSink;
pub use stream::{HttpSettings, StreamError, fetch_text, http_client, ndjson_lines, read_lines};
pub use writer::{MappingPolicy, WriteOptions, WriteStats, write_all};
