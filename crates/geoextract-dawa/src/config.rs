//! Extraction run configuration

use std::collections::BTreeMap;
use std::path::PathBuf;

use geoextract_core::{ExtractError, HttpSettings, MappingPolicy};
use serde::Deserialize;

use crate::api::DEFAULT_BASE_URL;
use crate::state::Dataset;

/// Which datasets to extract, keyed by dataset name.
///
/// Missing names count as disabled. Unknown names are kept so they can be
/// reported, but never selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DatasetConfig(BTreeMap<String, bool>);

impl DatasetConfig {
    /// Every known dataset enabled
    pub fn all_enabled() -> Self {
        Dataset::all().iter().map(|d| (d.name().to_string(), true)).collect()
    }

    /// Only the given datasets enabled
    pub fn only(datasets: &[Dataset]) -> Self {
        datasets.iter().map(|d| (d.name().to_string(), true)).collect()
    }

    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.0.insert(name.into(), enabled);
    }

    pub fn is_enabled(&self, dataset: Dataset) -> bool {
        self.0.get(dataset.name()).copied().unwrap_or(false)
    }

    /// Enabled datasets in processing order, independent of map order
    pub fn select_enabled(&self) -> Vec<Dataset> {
        Dataset::all()
            .iter()
            .copied()
            .filter(|d| self.is_enabled(*d))
            .collect()
    }

    /// Names that don't match any dataset
    pub fn unknown_names(&self) -> Vec<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|name| Dataset::from_name(name).is_none())
            .collect()
    }
}

impl FromIterator<(String, bool)> for DatasetConfig {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Runtime configuration for one extraction run
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the `<dataset>.geojson` files are written to
    pub out_dir_path: PathBuf,
    pub base_url: String,
    pub datasets: DatasetConfig,
    pub on_mapping_error: MappingPolicy,
    pub http: HttpSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir_path: PathBuf::from("./out"),
            base_url: DEFAULT_BASE_URL.to_string(),
            datasets: DatasetConfig::all_enabled(),
            on_mapping_error: MappingPolicy::default(),
            http: HttpSettings::default(),
        }
    }
}

impl Config {
    /// Reject settings that can't possibly produce a run
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.out_dir_path.as_os_str().is_empty() {
            return Err(ExtractError::Configuration(
                "out_dir_path must not be empty".to_string(),
            ));
        }

        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            ExtractError::Configuration(format!("invalid base_url {:?}: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExtractError::Configuration(format!(
                "base_url must be http or https, got {:?}",
                url.scheme()
            )));
        }

        if self.http.connect_timeout.is_zero() || self.http.read_timeout.is_zero() {
            return Err(ExtractError::Configuration(
                "http timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use geoextract_core::ErrorKind;

    use super::*;

    #[test]
    fn default_enables_everything() {
        let config = Config::default();
        assert_eq!(config.datasets.select_enabled(), Dataset::all().to_vec());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn selection_follows_declared_order() {
        let datasets: DatasetConfig = [
            ("postnummer".to_string(), true),
            ("adgangsadresse".to_string(), true),
            ("vej".to_string(), false),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            datasets.select_enabled(),
            vec![Dataset::AccessAddress, Dataset::PostCode]
        );
    }

    #[test]
    fn missing_names_are_disabled() {
        let datasets = DatasetConfig::only(&[Dataset::Road]);
        assert!(datasets.is_enabled(Dataset::Road));
        assert!(!datasets.is_enabled(Dataset::PostCode));
    }

    #[test]
    fn unknown_names_are_reported_not_selected() {
        let mut datasets = DatasetConfig::default();
        datasets.set("matrikel", true);
        datasets.set("vej", true);
        assert_eq!(datasets.unknown_names(), vec!["matrikel"]);
        assert_eq!(datasets.select_enabled(), vec![Dataset::Road]);
    }

    #[test]
    fn deserializes_from_map() {
        let datasets: DatasetConfig =
            serde_json::from_str(r#"{"vej": true, "postnummer": false}"#).unwrap();
        assert_eq!(datasets.select_enabled(), vec![Dataset::Road]);
    }

    #[test]
    fn rejects_empty_out_dir() {
        let config = Config {
            out_dir_path: PathBuf::new(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn rejects_bad_base_url() {
        for url in ["not a url", "ftp://dawa.example"] {
            let config = Config {
                base_url: url.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{url} should be rejected");
        }
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = Config {
            http: HttpSettings {
                connect_timeout: Duration::ZERO,
                read_timeout: Duration::from_secs(1),
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
