use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

const APP_DIR: &str = "country-atlas";
const SUMMARY_IMAGE_FILE: &str = "summary.png";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_countries_url")]
    pub countries_url: String,

    #[serde(default = "default_rates_url")]
    pub rates_url: String,

    /// Directory holding the rendered summary image
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_db_path() -> String {
    data_dir().join("countries.db").to_string_lossy().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_countries_url() -> String {
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies"
        .to_string()
}

fn default_rates_url() -> String {
    "https://open.er-api.com/v6/latest/USD".to_string()
}

fn default_cache_dir() -> String {
    data_dir().join("cache").to_string_lossy().to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            host: default_host(),
            port: default_port(),
            countries_url: default_countries_url(),
            rates_url: default_rates_url(),
            cache_dir: default_cache_dir(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, writing a default config there if none exists yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    pub fn summary_image_path(&self) -> PathBuf {
        Path::new(&self.cache_dir).join(SUMMARY_IMAGE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("port = 8080\nhost = \"0.0.0.0\"").unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.rates_url, "https://open.er-api.com/v6/latest/USD");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn summary_image_lives_in_cache_dir() {
        let config = Config {
            cache_dir: "/tmp/atlas-cache".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.summary_image_path(),
            PathBuf::from("/tmp/atlas-cache/summary.png")
        );
    }

    #[test]
    fn host_may_be_a_name() {
        let config: Config = toml::from_str("host = \"localhost\"").unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.port, 3000);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.countries_url, config.countries_url);
    }
}
