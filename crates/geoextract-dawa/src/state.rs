//! Dataset and transaction types for DAWA extraction

use std::fmt;

use serde::Deserialize;

/// Datasets extracted from DAWA, in processing order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Access addresses (house number level, with coordinates)
    AccessAddress,
    /// Unit addresses (floor/door level)
    UnitAddress,
    /// Named roads
    Road,
    /// Postal districts
    PostCode,
}

impl Dataset {
    /// Parse config/CLI name into enum
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "adgangsadresse" => Some(Self::AccessAddress),
            "enhedsadresse" => Some(Self::UnitAddress),
            "vej" => Some(Self::Road),
            "postnummer" => Some(Self::PostCode),
            _ => None,
        }
    }

    /// Config key and output file stem
    pub fn name(self) -> &'static str {
        match self {
            Self::AccessAddress => "adgangsadresse",
            Self::UnitAddress => "enhedsadresse",
            Self::Road => "vej",
            Self::PostCode => "postnummer",
        }
    }

    /// Entity name in the DAWA replication API
    pub fn entity(self) -> &'static str {
        match self {
            Self::AccessAddress => "adgangsadresse",
            Self::UnitAddress => "adresse",
            Self::Road => "navngivenvej",
            Self::PostCode => "postnummer",
        }
    }

    /// Output file name, e.g. `vej.geojson`
    pub fn file_name(self) -> String {
        format!("{}.geojson", self.name())
    }

    /// Every dataset, in the order a run processes them
    pub fn all() -> &'static [Dataset] {
        &[
            Self::AccessAddress,
            Self::UnitAddress,
            Self::Road,
            Self::PostCode,
        ]
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// DAWA transaction id: the snapshot every dataset of one run is read at
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a run is in its lifecycle.
///
/// `NoWork`, `Completed`, `Cancelled` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    SelectingDatasets,
    NoWork,
    ResolvingAnchor,
    ProcessingDataset(Dataset),
    Completed,
    Cancelled,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::NoWork | Self::Completed | Self::Cancelled | Self::Failed
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::SelectingDatasets => f.write_str("selecting datasets"),
            Self::NoWork => f.write_str("nothing to do"),
            Self::ResolvingAnchor => f.write_str("resolving transaction"),
            Self::ProcessingDataset(d) => write!(f, "processing {d}"),
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Failed => f.write_str("failed"),
        }
    }
}
