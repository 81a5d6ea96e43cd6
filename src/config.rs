use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR_PREFIX: &str = "sheet-loader";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub google: GoogleConfig,
    pub loaders: BTreeMap<String, LoaderConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

fn default_port() -> u16 {
    5432
}

fn default_query_timeout() -> u64 {
    300
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GoogleConfig {
    /// Path to the provider-issued client secret JSON bundle.
    pub client_secret_file: PathBuf,
}

/// One unit of work: a query plus the spreadsheet range its results land in.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LoaderConfig {
    pub query: String,
    /// Spreadsheet id of the destination document.
    pub sheet: String,
    /// A1-notation range the grid replaces, e.g. "Export!A1:F100".
    pub range: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file()?;

        if !config_path.exists() {
            return Err(AppError::Config(format!(
                "Config file not found at {:?}. Please create one.",
                config_path
            )));
        }

        let contents = fs::read_to_string(&config_path)?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.database.host.is_empty() || self.database.dbname.is_empty() {
            return Err(AppError::Config(
                "database host and dbname must be set in config file".to_string(),
            ));
        }

        if self.google.client_secret_file.as_os_str().is_empty() {
            return Err(AppError::Config(
                "google client_secret_file must be set in config file".to_string(),
            ));
        }

        if self.loaders.is_empty() {
            return Err(AppError::Config(
                "at least one loader must be configured".to_string(),
            ));
        }

        for (name, loader) in &self.loaders {
            if loader.query.is_empty() || loader.sheet.is_empty() || loader.range.is_empty() {
                return Err(AppError::Config(format!(
                    "loader '{}' must set query, sheet and range",
                    name
                )));
            }
        }

        Ok(())
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file("config.yaml")
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))
    }

    /// Get a cache file path
    pub fn cache_file(filename: &str) -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.place_cache_file(filename)
            .map_err(|e| AppError::Config(format!("Failed to create cache file path: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
database:
  host: db.internal
  user: exporter
  password: hunter2
  dbname: analytics
google:
  client_secret_file: /etc/sheet-loader/client_secret.json
loaders:
  orders:
    query: SELECT id, total FROM orders
    sheet: 1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms
    range: Orders!A1:B500
  refunds:
    query: SELECT id, amount FROM refunds
    sheet: 1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms
    range: Refunds!A1:B500
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::parse(SAMPLE).unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 5432, "port should default");
        assert_eq!(config.database.query_timeout_secs, 300);
        assert_eq!(config.loaders.len(), 2);
        assert_eq!(config.loaders["refunds"].range, "Refunds!A1:B500");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::parse(SAMPLE).unwrap();

        let serialized = serde_yaml::to_string(&config).unwrap();
        let deserialized: Config = serde_yaml::from_str(&serialized).unwrap();

        assert_eq!(config.database.dbname, deserialized.database.dbname);
        assert_eq!(
            config.loaders["orders"].query,
            deserialized.loaders["orders"].query
        );
    }

    #[test]
    fn test_rejects_empty_loaders() {
        let yaml = r#"
database:
  host: db.internal
  user: exporter
  password: hunter2
  dbname: analytics
google:
  client_secret_file: /etc/sheet-loader/client_secret.json
loaders: {}
"#;
        let err = Config::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("at least one loader"));
    }

    #[test]
    fn test_rejects_incomplete_loader() {
        let yaml = r#"
database:
  host: db.internal
  user: exporter
  password: hunter2
  dbname: analytics
google:
  client_secret_file: /etc/sheet-loader/client_secret.json
loaders:
  orders:
    query: SELECT 1
    sheet: ""
    range: Orders!A1
"#;
        let err = Config::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("loader 'orders'"));
    }
}
