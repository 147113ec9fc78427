use serde::{Deserialize, Serialize};

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::{ttl_from_env, UpstreamConfig};

/// Main configuration structure for Gatewatch
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Web server configuration (port, bind address, static dir)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream analytics API configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Summary cache and snapshot configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub web_port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub snapshot_dir: Option<String>,
}

impl Config {
    /// Load configuration from file or use defaults.
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. gatewatch.toml in current directory
    /// 3. Default configuration
    ///
    /// Environment credentials/TTL are applied last and win over the file.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("gatewatch.toml").exists() {
            Self::from_file("gatewatch.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.upstream.resolve_env();
        if let Some(ttl) = ttl_from_env() {
            config.cache.ttl_ms = ttl;
        }
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.web_port {
            self.server.web_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(dir) = overrides.snapshot_dir {
            self.cache.snapshot_dir = Some(dir);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.ttl_ms <= 0 {
            return Err(ConfigError::Validation(format!(
                "cache.ttl_ms must be positive, got {}",
                self.cache.ttl_ms
            )));
        }
        if self.upstream.page_limit == 0 {
            return Err(ConfigError::Validation(
                "upstream.page_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.ttl_ms, 6 * 60 * 60 * 1000);
        assert_eq!(config.upstream.page_limit, 1000);
    }

    #[test]
    fn toml_sections_are_optional() {
        let config: Config = toml::from_str("[server]\nweb_port = 9090\n").unwrap();
        assert_eq!(config.server.web_port, 9090);
        assert_eq!(config.cache.top_n, 15);
    }
}
