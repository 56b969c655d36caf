//! Error types for dataset extraction

use crate::stream::StreamError;

/// Coarse classification of an [`ExtractError`], reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    UpstreamUnavailable,
    Mapping,
    Io,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "ConfigurationError",
            Self::UpstreamUnavailable => "UpstreamUnavailable",
            Self::Mapping => "MappingError",
            Self::Io => "IoError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that could not be turned into a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingError {
    /// Identifier of the offending record, when it has one
    pub record_id: Option<String>,
    pub reason: String,
}

impl MappingError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            record_id: None,
            reason: reason.into(),
        }
    }

    /// Attach the id of the record being mapped
    pub fn for_record(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.record_id {
            Some(id) => write!(f, "record {id}: {}", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

impl std::error::Error for MappingError {}

/// Error from extracting a single dataset.
///
/// Every variant is fatal to the dataset being processed and to the run.
#[derive(Debug)]
pub enum ExtractError {
    /// Invalid or missing settings, raised before any network activity
    Configuration(String),
    /// Transaction or record fetch failed
    Upstream(StreamError),
    Mapping(MappingError),
    /// Output file could not be created or written
    Io(std::io::Error),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Upstream(_) => ErrorKind::UpstreamUnavailable,
            Self::Mapping(_) => ErrorKind::Mapping,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = self.kind();
        match self {
            Self::Configuration(msg) => write!(f, "{kind}: {msg}"),
            Self::Upstream(e) => write!(f, "{kind}: {e}"),
            Self::Mapping(e) => write!(f, "{kind}: {e}"),
            Self::Io(e) => write!(f, "{kind}: {e}"),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(_) => None,
            Self::Upstream(e) => Some(e),
            Self::Mapping(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<StreamError> for ExtractError {
    fn from(e: StreamError) -> Self {
        Self::Upstream(e)
    }
}

impl From<MappingError> for ExtractError {
    fn from(e: MappingError) -> Self {
        Self::Mapping(e)
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
