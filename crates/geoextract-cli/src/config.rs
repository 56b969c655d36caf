//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use geoextract_core::{HttpSettings, MappingPolicy};
use geoextract_dawa::{DEFAULT_BASE_URL, DatasetConfig};
use serde::Deserialize;

/// Global configuration for geoextract
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_env_path")]
    pub out_dir_path: PathBuf,
    pub dawa: DawaConfig,
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir_path: PathBuf::from("./out"),
            dawa: DawaConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DawaConfig {
    #[serde(deserialize_with = "deserialize_env_string")]
    pub base_url: String,
    pub on_mapping_error: MappingPolicy,
    pub datasets: DatasetConfig,
}

impl Default for DawaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            on_mapping_error: MappingPolicy::default(),
            datasets: DatasetConfig::all_enabled(),
        }
    }
}

/// HTTP timeouts in seconds
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout: u64,
    /// Stall detection: max seconds without a complete line
    pub read_timeout: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let defaults = HttpSettings::default();
        Self {
            connect_timeout: defaults.connect_timeout.as_secs(),
            read_timeout: defaults.read_timeout.as_secs(),
        }
    }
}

impl From<HttpConfig> for HttpSettings {
    fn from(c: HttpConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(c.connect_timeout),
            read_timeout: Duration::from_secs(c.read_timeout),
        }
    }
}

fn deserialize_env_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    expand_env_var(&s).map_err(serde::de::Error::custom)
}

fn deserialize_env_path<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_env_string(deserializer).map(PathBuf::from)
}

/// Expand a whole-value `${VAR}` reference from the environment
fn expand_env_var(s: &str) -> std::result::Result<String, String> {
    match s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        Some(var_name) => std::env::var(var_name)
            .map_err(|_| format!("environment variable {var_name} is not set")),
        None => Ok(s.to_string()),
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./geoextract.toml (current directory)
    /// 2. ~/.config/geoextract/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("geoextract.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "geoextract") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Settings for one extraction run
    pub fn run_config(&self) -> geoextract_dawa::Config {
        geoextract_dawa::Config {
            out_dir_path: self.out_dir_path.clone(),
            base_url: self.dawa.base_url.clone(),
            datasets: self.dawa.datasets.clone(),
            on_mapping_error: self.dawa.on_mapping_error,
            http: self.http.into(),
        }
    }
}
