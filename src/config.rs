use crate::dates;
use crate::storage;
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_COLUMN_LABELS: [&str; 23] = [
    "Opening",
    "Polson 1",
    "Polson 2",
    "Polson 3",
    "Polson 4",
    "Polson 5",
    "Polson 6",
    "Dillon 1",
    "Dillon 2",
    "Salmon 1",
    "Salmon 2",
    "Havre 1",
    "Havre 2",
    "Havre 3",
    "Havre 4",
    "Glasgow 1",
    "Glasgow 2",
    "Wolf Point 1",
    "Wolf Point 2",
    "Cutbank 1",
    "Cutbank 2",
    "Lewistown 1",
    "Lewistown 2",
];

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("config must name at least one column")]
    NoLabels,
    #[error("no config directory available on this system")]
    NoConfigDir,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub column_labels: Vec<String>,
    pub epoch: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            column_labels: DEFAULT_COLUMN_LABELS.iter().map(|s| s.to_string()).collect(),
            epoch: dates::default_epoch(),
            data_file: None,
            log_level: "warn".into(),
        }
    }
}

impl Config {
    /// Reads `path`, or returns the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&data)?;
        if config.column_labels.is_empty() {
            return Err(ConfigError::NoLabels);
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let serialized = serde_yaml::to_string(self)?;
        fs::write(path, serialized).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn data_path(&self) -> Option<PathBuf> {
        self.data_file.clone().or_else(storage::default_data_path)
    }
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("", "", "skedbord")
        .map(|dirs| dirs.config_dir().join("config.yml"))
        .ok_or(ConfigError::NoConfigDir)
}
