use gindata::dataset::UnknownIdPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Defaults read from the CLI config file. Command-line flags override them.
#[derive(Debug, Default)]
pub struct CliConfig {
    path: Option<PathBuf>,
    data: RawConfig,
}

impl CliConfig {
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = explicit.or_else(default_config_path);
        let data = match path.as_ref() {
            Some(config_path) if config_path.exists() => read_file(config_path)?,
            _ => RawConfig::default(),
        };
        validate(&data)?;
        Ok(Self { path, data })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn data_root(&self) -> Option<&PathBuf> {
        self.data.dataset.data_root.as_ref()
    }

    pub fn degree_as_tag(&self) -> Option<bool> {
        self.data.dataset.degree_as_tag
    }

    pub fn unknown_ids(&self) -> Option<UnknownIdPolicy> {
        self.data.dataset.unknown_ids
    }

    pub fn delimiter(&self) -> Option<u8> {
        self.data
            .dataset
            .delimiter
            .as_deref()
            .and_then(|raw| parse_delimiter(raw).ok())
    }

    pub fn features_suffix(&self) -> Option<&str> {
        self.data.dataset.features_suffix.as_deref()
    }

    pub fn graph_suffix(&self) -> Option<&str> {
        self.data.dataset.graph_suffix.as_deref()
    }
}

/// Parses a one-byte field delimiter; `\t` and `tab` name a tab.
pub fn parse_delimiter(raw: &str) -> Result<u8, String> {
    match raw {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }
    match raw.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(format!(
            "delimiter must be a single byte, got '{raw}'"
        )),
    }
}

fn read_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn validate(data: &RawConfig) -> Result<(), ConfigError> {
    if let Some(raw) = data.dataset.delimiter.as_deref() {
        parse_delimiter(raw).map_err(|_| ConfigError::InvalidDelimiter {
            value: raw.to_string(),
        })?;
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RawConfig {
    #[serde(default)]
    dataset: DatasetSection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct DatasetSection {
    data_root: Option<PathBuf>,
    degree_as_tag: Option<bool>,
    unknown_ids: Option<UnknownIdPolicy>,
    delimiter: Option<String>,
    features_suffix: Option<String>,
    graph_suffix: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read CLI config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse CLI config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("config delimiter '{value}' must be a single byte")]
    InvalidDelimiter { value: String },
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("gindata").join("cli.toml"))
}
