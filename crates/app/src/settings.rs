//! Settings for the `sarraf` binary. Configuration is written in
//! `settings.toml` and can be overridden with `SARRAF__SECTION__KEY`
//! environment variables.
//!
//! See `settings.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub database: Database,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            database: Database::Sqlite("sarraf.db".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Backup {
    pub directory: String,
}

impl Default for Backup {
    fn default() -> Self {
        Self {
            directory: "backups".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub storage: Storage,
    pub backup: Backup,
}

impl Settings {
    /// Reads `path` (or `settings.toml` in the working directory) when it
    /// exists, then applies environment overrides.
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(path.is_some()))
            .add_source(Environment::with_prefix("SARRAF").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    #[cfg(test)]
    fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(raw, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
