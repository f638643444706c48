use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_ASSET_BASE_URL, DEFAULT_ENDPOINT, DEFAULT_STORAGE_ROOT_MARKER,
    DEFAULT_TOAST_TIMEOUT_MS,
};

const CONFIG_FILE_NAME: &str = "config.yaml";

/// User configuration, read once at startup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enhancement endpoint receiving the multipart upload
    pub endpoint: String,
    /// Origin that serves the processed images
    pub asset_base_url: String,
    pub storage_root_marker: String,
    pub toast_timeout_ms: u64,
    /// Where downloaded images are saved
    pub download_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: String::from(DEFAULT_ENDPOINT),
            asset_base_url: String::from(DEFAULT_ASSET_BASE_URL),
            storage_root_marker: String::from(DEFAULT_STORAGE_ROOT_MARKER),
            toast_timeout_ms: DEFAULT_TOAST_TIMEOUT_MS,
            download_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl Config {
    /// Default location: ~/.enhancer-tui/config.yaml
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = Self::default_path();
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config");
                Config::default()
            }
        }
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn toast_timeout(&self) -> Duration {
        Duration::from_millis(self.toast_timeout_ms)
    }

    /// Absolute URL of a servable image path
    pub fn asset_url(&self, servable_path: &str) -> String {
        format!("{}{}", self.asset_base_url.trim_end_matches('/'), servable_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.endpoint, "http://127.0.0.1:5000/enhance");
        assert_eq!(config.toast_timeout(), Duration::from_millis(3000));
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "endpoint: http://gpu-box:5000/enhance\ntoast_timeout_ms: 1500\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.endpoint, "http://gpu-box:5000/enhance");
        assert_eq!(config.toast_timeout_ms, 1500);
        assert_eq!(config.storage_root_marker, "public\\");
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        assert!(Config::from_yaml("toast_timeout_ms: [not a number").is_err());
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_asset_url_joins_without_double_slash() {
        let config = Config {
            asset_base_url: String::from("http://localhost:5173/"),
            ..Config::default()
        };
        assert_eq!(
            config.asset_url("/images/out.png"),
            "http://localhost:5173/images/out.png"
        );
    }
}
