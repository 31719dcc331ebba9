//! QuoteSync configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main QuoteSync configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteSyncConfig {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Server sync configuration
    #[serde(default)]
    pub sync: SyncConfig,

    /// HTTP API configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl QuoteSyncConfig {
    /// Default config file location (`<config_dir>/quotesync/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|p| p.join("quotesync").join("config.toml"))
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Load from an explicit path, else from the default path if it exists,
    /// else fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the persistent key-value slots
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs_next::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("quotesync"),
        }
    }
}

/// Server sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Run the periodic sync loop in `serve`
    pub enabled: bool,

    /// Collection endpoint used for both fetch (GET) and push (POST)
    pub endpoint: String,

    /// Seconds between periodic syncs
    pub interval_secs: u64,

    /// Maximum number of remote items taken per fetch
    pub fetch_limit: usize,

    /// Category assigned to every fetched quote
    pub server_category: String,

    /// `userId` sent with pushed quotes
    pub user_id: u64,

    /// Seconds a sync status message stays visible
    pub status_ttl_secs: u64,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://jsonplaceholder.typicode.com/posts".to_string(),
            interval_secs: 30,
            fetch_limit: 10,
            server_category: "Server".to_string(),
            user_id: 1,
            status_ttl_secs: 4,
            timeout_secs: 10,
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 18791,
            cors_origins: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = QuoteSyncConfig::default();
        assert!(config.sync.enabled);
        assert_eq!(config.sync.interval_secs, 30);
        assert_eq!(config.sync.fetch_limit, 10);
        assert_eq!(config.sync.server_category, "Server");
        assert_eq!(config.sync.status_ttl_secs, 4);
        assert_eq!(config.server.port, 18791);
        assert!(config.storage.data_dir.ends_with("quotesync"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: QuoteSyncConfig = toml::from_str(
            r#"
            [sync]
            interval_secs = 5
            endpoint = "http://localhost:9000/posts"
            "#,
        )
        .unwrap();

        assert_eq!(config.sync.interval_secs, 5);
        assert_eq!(config.sync.endpoint, "http://localhost:9000/posts");
        assert_eq!(config.sync.fetch_limit, 10);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = QuoteSyncConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: QuoteSyncConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.sync.endpoint, config.sync.endpoint);
        assert_eq!(parsed.storage.data_dir, config.storage.data_dir);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9999\n").unwrap();

        let config = QuoteSyncConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn test_load_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = QuoteSyncConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
