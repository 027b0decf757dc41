use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GateError;

const MAX_CONFIG_RETRIES: u32 = 5;

pub const DEFAULT_DB_PATH: &str = "whitelist.sqlite3.db";
pub const DEFAULT_LISTEN: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub permission: PermissionConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    pub path: String,
    // Round-tripped to disk but never consulted; encryption is not implemented.
    #[serde(rename = "useEncrypt")]
    pub use_encrypt: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionConfig {
    #[serde(rename = "enableCommandblock")]
    pub enable_commandblock: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: DEFAULT_DB_PATH.to_string(),
                use_encrypt: false,
            },
            permission: PermissionConfig {
                enable_commandblock: false,
            },
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the config file, creating it with defaults when missing. A file
    /// that fails to parse is rewritten with defaults and loading is retried,
    /// a bounded number of times.
    pub fn load_or_create(path: &Path) -> Result<Self, GateError> {
        let mut retries = 0;

        loop {
            if !path.exists() {
                Self::default().save(path)?;
            }

            let raw = fs::read_to_string(path)
                .map_err(|e| GateError::Config(format!("could not read {}: {e}", path.display())))?;

            match serde_yaml::from_str::<AppConfig>(&raw) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    retries += 1;
                    if retries > MAX_CONFIG_RETRIES {
                        return Err(GateError::Config(format!(
                            "gave up re-creating {} after {MAX_CONFIG_RETRIES} retries",
                            path.display()
                        )));
                    }
                    tracing::warn!(
                        "Incorrect config file, rewriting it with defaults ({e}) (Retry x{retries})"
                    );
                    Self::default().save(path)?;
                }
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), GateError> {
        let raw = serde_yaml::to_string(self)
            .map_err(|e| GateError::Config(format!("could not serialize config: {e}")))?;
        fs::write(path, raw)
            .map_err(|e| GateError::Config(format!("could not write {}: {e}", path.display())))
    }
}

/// Config file location, overridable for tests and packaging.
pub fn config_path() -> PathBuf {
    std::env::var("CONFIG_PATH")
        .unwrap_or_else(|_| "config.yaml".to_string())
        .into()
}
