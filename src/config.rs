//! Configuration management for RAX Cloud
//!
//! All settings are loaded once at startup (built-in defaults, then an optional
//! `config.toml`, then `RAX_CLOUD_*` environment variables) and shared read-only.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable naming an alternative configuration file
pub const CONFIG_FILE_ENV: &str = "RAX_CLOUD_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "config";

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    // ═══ NETWORK ═══
    /// IP address the HTTP listener binds to
    pub bind_address: String,

    /// Port for the HTTP listener
    pub port: u16,

    // ═══ STORAGE ═══
    /// Storage root: every managed folder and file lives below it
    pub cloud_path: PathBuf,

    /// JSON array of regex patterns excluded from folder listings
    pub ignored_path: PathBuf,

    /// JSON array of folders hidden from display
    pub hidden_path: PathBuf,

    /// JSON array of usernames allowed to see dot-folders
    pub sudoers_path: PathBuf,

    /// Append-only audit log
    pub log_path: PathBuf,

    // ═══ LIMITS ═══
    /// Maximum request body size for uploads, in MB
    pub max_upload_size_mb: u64,
}

impl ServerConfig {
    /// Load configuration from defaults, the config file and environment overrides.
    ///
    /// The config file is optional; `RAX_CLOUD_CONFIG` selects a different one.
    pub fn load() -> Result<Self, config::ConfigError> {
        let file = std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());

        let settings = Self::defaults()?
            .add_source(File::with_name(&file).required(false))
            .add_source(Environment::with_prefix("RAX_CLOUD").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration rooted at `dir`: storage in `dir/cloud`, state files next to it.
    pub fn rooted_at(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            bind_address: "127.0.0.1".into(),
            port: 5000,
            cloud_path: dir.join("cloud"),
            ignored_path: dir.join("ignored.json"),
            hidden_path: dir.join("hidden.json"),
            sudoers_path: dir.join("sudoers.json"),
            log_path: dir.join("cloud.log"),
            max_upload_size_mb: 1024,
        }
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        Config::builder()
            .set_default("bind_address", "127.0.0.1")?
            .set_default("port", 5000)?
            .set_default("cloud_path", "./cloud")?
            .set_default("ignored_path", "./ignored.json")?
            .set_default("hidden_path", "./hidden.json")?
            .set_default("sudoers_path", "./sudoers.json")?
            .set_default("log_path", "./cloud.log")?
            .set_default("max_upload_size_mb", 1024)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.bind_address.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        let paths = [
            ("cloud_path", &self.cloud_path),
            ("ignored_path", &self.ignored_path),
            ("hidden_path", &self.hidden_path),
            ("sudoers_path", &self.sudoers_path),
            ("log_path", &self.log_path),
        ];
        for (name, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(config::ConfigError::Message(format!(
                    "{name} cannot be empty"
                )));
            }
        }

        if self.max_upload_size_mb == 0 {
            return Err(config::ConfigError::Message(
                "max_upload_size_mb must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get maximum upload size in bytes, capped at `usize::MAX`
    pub fn max_upload_size_bytes(&self) -> usize {
        let bytes = self.max_upload_size_mb.saturating_mul(1024 * 1024);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_config_is_valid() {
        let config = ServerConfig::rooted_at("/tmp/rax");
        assert!(config.validate().is_ok());
        assert_eq!(config.cloud_path, PathBuf::from("/tmp/rax/cloud"));
        assert_eq!(config.listen_socket(), "127.0.0.1:5000");
    }

    #[test]
    fn rejects_zero_port() {
        let mut config = ServerConfig::rooted_at("/tmp/rax");
        config.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_storage_root() {
        let mut config = ServerConfig::rooted_at("/tmp/rax");
        config.cloud_path = PathBuf::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cloud_path"));
    }

    #[test]
    fn rejects_zero_upload_limit() {
        let mut config = ServerConfig::rooted_at("/tmp/rax");
        config.max_upload_size_mb = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn upload_limit_in_bytes() {
        let mut config = ServerConfig::rooted_at("/tmp/rax");
        config.max_upload_size_mb = 2;
        assert_eq!(config.max_upload_size_bytes(), 2 * 1024 * 1024);
    }

    #[test]
    fn huge_upload_limit_saturates() {
        let mut config = ServerConfig::rooted_at("/tmp/rax");
        config.max_upload_size_mb = u64::MAX / 1024;
        assert!(config.validate().is_ok());
        assert_eq!(config.max_upload_size_bytes(), usize::MAX);

        config.max_upload_size_mb = u64::MAX;
        assert_eq!(config.max_upload_size_bytes(), usize::MAX);
    }

    #[test]
    fn defaults_deserialize() {
        let config: ServerConfig = ServerConfig::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.cloud_path, PathBuf::from("./cloud"));
        assert!(config.validate().is_ok());
    }
}
