#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for updatekit
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/updatekit/config.toml)
//! - Environment variables
//!
//! The update client never caches the server address: it reads it from a
//! [`SharedConfig`] on every call, so the host can change it at runtime.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::sync::RwLock;
use updatekit_errors::{ConfigError, Error};

/// Placeholder substituted with the version in artifact file name templates
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Configuration shared between the host and the update client
pub type SharedConfig = Arc<RwLock<Config>>;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub update: UpdateConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

/// Update server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Base URL of the update server; unset or empty means "not configured"
    #[serde(default)]
    pub server_url: Option<String>,
    #[serde(default = "default_remote_file_template")]
    pub remote_file_template: String,
    #[serde(default = "default_local_file_template")]
    pub local_file_template: String,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
    #[serde(default = "default_read_timeout")]
    pub read_timeout: u64, // seconds
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub download_dir: Option<PathBuf>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            remote_file_template: default_remote_file_template(),
            local_file_template: default_local_file_template(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 15,
            read_timeout: 60,
        }
    }
}

fn default_remote_file_template() -> String {
    "EVCam-v{version}-release.apk".to_string()
}

fn default_local_file_template() -> String {
    "EVCam_{version}.apk".to_string()
}

fn default_connect_timeout() -> u64 {
    15
}

fn default_read_timeout() -> u64 {
    60
}

impl UpdateConfig {
    /// Whether an update server address is set
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.server_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// Server base URL, always ending in `/`; `None` when not configured
    #[must_use]
    pub fn base_url(&self) -> Option<String> {
        let url = self.server_url.as_deref().filter(|url| !url.is_empty())?;
        if url.ends_with('/') {
            Some(url.to_string())
        } else {
            Some(format!("{url}/"))
        }
    }

    /// File name of the artifact for `version` on the update server
    #[must_use]
    pub fn remote_file_name(&self, version: &str) -> String {
        self.remote_file_template.replace(VERSION_PLACEHOLDER, version)
    }

    /// File name the artifact for `version` is saved under
    #[must_use]
    pub fn local_file_name(&self, version: &str) -> String {
        self.local_file_template.replace(VERSION_PLACEHOLDER, version)
    }
}

impl NetworkConfig {
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("updatekit").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // UPDATEKIT_SERVER_URL
        if let Ok(url) = std::env::var("UPDATEKIT_SERVER_URL") {
            self.update.server_url = Some(url);
        }

        // UPDATEKIT_DOWNLOAD_DIR
        if let Ok(dir) = std::env::var("UPDATEKIT_DOWNLOAD_DIR") {
            if dir.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "UPDATEKIT_DOWNLOAD_DIR".to_string(),
                    value: dir,
                }
                .into());
            }
            self.paths.download_dir = Some(PathBuf::from(dir));
        }

        // UPDATEKIT_CONNECT_TIMEOUT
        if let Ok(secs) = std::env::var("UPDATEKIT_CONNECT_TIMEOUT") {
            self.network.connect_timeout =
                secs.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "UPDATEKIT_CONNECT_TIMEOUT".to_string(),
                    value: secs,
                })?;
        }

        // UPDATEKIT_READ_TIMEOUT
        if let Ok(secs) = std::env::var("UPDATEKIT_READ_TIMEOUT") {
            self.network.read_timeout = secs.parse().map_err(|_| ConfigError::InvalidValue {
                field: "UPDATEKIT_READ_TIMEOUT".to_string(),
                value: secs,
            })?;
        }

        Ok(())
    }

    /// Directory downloaded artifacts are written to
    ///
    /// Uses `paths.download_dir` when set, otherwise the user's downloads
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no downloads directory can be determined.
    pub fn download_dir(&self) -> Result<PathBuf, Error> {
        if let Some(dir) = &self.paths.download_dir {
            return Ok(dir.clone());
        }
        dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
            .ok_or_else(|| ConfigError::DownloadDirUnavailable.into())
    }

    /// Wrap this configuration for sharing with an update client
    #[must_use]
    pub fn into_shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }
}
