use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use super::server::ServerConfig;
use super::watcher::WatcherConfig;

/// Main configuration structure for indns
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener address, upstream sources, override directory
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream racing and cache bounds
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Override directory polling
    #[serde(default)]
    pub watcher: WatcherConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// The explicit path wins; otherwise `<prefix>/etc/indnsd.toml` is used
    /// when present. A missing file is not an error. Command-line overrides
    /// are not applied here; see [`Config::with_overrides`].
    pub fn load(path: Option<&Path>, prefix: &Path) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Self::default_path(prefix));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_prefix_defaults(prefix);
        Ok(config)
    }

    /// Runtime view: the loaded configuration with command-line values on top.
    /// The result is never what gets saved back to disk.
    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        self.apply_cli_overrides(overrides);
        self
    }

    pub fn default_path(prefix: &Path) -> PathBuf {
        prefix.join("etc").join("indnsd.toml")
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.display().to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if !overrides.name_servers.is_empty() {
            let mut servers = overrides.name_servers;
            servers.append(&mut self.server.name_servers);
            self.server.name_servers = servers;
        }
        if let Some(dir) = overrides.config_directory {
            self.server.config_directory = dir;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    fn apply_prefix_defaults(&mut self, prefix: &Path) {
        if self.server.config_directory.trim().is_empty() {
            self.server.config_directory = prefix
                .join("etc")
                .join("conf.d")
                .to_string_lossy()
                .into_owned();
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind.parse().map_err(|_| {
            ConfigError::Validation(format!("invalid bind address '{}'", self.server.bind))
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;

        if self.resolver.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "resolver.query_timeout_ms cannot be 0".to_string(),
            ));
        }
        if self.resolver.stagger_ms == 0 {
            return Err(ConfigError::Validation(
                "resolver.stagger_ms cannot be 0".to_string(),
            ));
        }
        if self.resolver.min_cache_ttl > self.resolver.max_cache_ttl {
            return Err(ConfigError::Validation(format!(
                "resolver.min_cache_ttl ({}) exceeds max_cache_ttl ({})",
                self.resolver.min_cache_ttl, self.resolver.max_cache_ttl
            )));
        }
        if self.watcher.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "watcher.poll_interval_ms cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::FileWrite(path.display().to_string(), e.to_string()))?;
        }
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.display().to_string(), e.to_string()))?;
        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub bind: Option<String>,
    /// Prepended to the file's `name_servers`, so they take priority.
    pub name_servers: Vec<String>,
    pub config_directory: Option<String>,
    pub log_level: Option<String>,
}
