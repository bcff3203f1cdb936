use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading deployment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Deployment configuration for a credit ledger instance.
///
/// The owner is fixed for the lifetime of the ledger; initial verifiers are
/// installed before the first operation runs, in addition to the owner's
/// implicit privilege.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Principal fixed as the contract owner at initialization.
    pub owner: String,

    /// Verifiers installed at initialization.
    #[serde(default)]
    pub initial_verifiers: Vec<String>,

    /// Height the host counter starts from.
    #[serde(default = "default_start_height")]
    pub start_height: u64,
}

fn default_start_height() -> u64 {
    1
}

impl LedgerConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
