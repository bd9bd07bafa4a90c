//! Gateway configuration.
//!
//! Values come from an optional `taskdeck.toml`, environment variables with
//! the `TASKDECK__` prefix (`__` separates nested keys, e.g.
//! `TASKDECK__SERVER__PORT`), and a handful of legacy direct variables
//! (`HOST`, `PORT`, `BACKEND_URL`, `RUST_LOG`). Environment values take
//! precedence over the file.

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub static_files: StaticFilesConfig,
    pub logging: LoggingConfig,
}

/// Network configuration for the gateway itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Whether to allow any origin (default: true).
    #[serde(default = "default_true")]
    pub allow_any_origin: bool,

    /// Specific allowed origins, used only when `allow_any_origin` is false.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// The backend API every proxy route forwards to. One origin for all routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_url")]
    pub base_url: String,
}

/// Where the compiled dashboard bundle is served from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,

    /// File served for any unmatched path, so hash-route deep links resolve.
    #[serde(default = "default_index_file")]
    pub index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter string.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, compact, full).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> IpAddr {
    "127.0.0.1".parse().unwrap()
}

fn default_port() -> u16 {
    3000
}

fn default_true() -> bool {
    true
}

fn default_upstream_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./dist")
}

fn default_index_file() -> String {
    "index.html".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            static_files: StaticFilesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_any_origin: true,
            allowed_origins: vec![],
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_url(),
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            dir: default_static_dir(),
            index: default_index_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from the optional config file and the environment.
    pub fn load() -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        let config_path =
            std::env::var("TASKDECK_CONFIG_FILE").unwrap_or_else(|_| "taskdeck.toml".to_string());

        if std::path::Path::new(&config_path).exists() {
            info!("Loading configuration from {}", config_path);
            builder = builder.add_source(File::with_name(&config_path));
        } else {
            debug!("No config file found at {}, using defaults", config_path);
        }

        builder = builder.add_source(
            Environment::with_prefix("TASKDECK")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let mut settings: GatewayConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        settings.apply_env_overrides()?;
        settings.validate()?;

        Ok(settings)
    }

    /// Apply direct environment variable overrides that don't fit the
    /// prefixed pattern.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host.parse().context("Invalid HOST value")?;
        }

        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port.parse().context("Invalid PORT value")?;
        }

        if let Ok(backend_url) = std::env::var("BACKEND_URL") {
            self.upstream.base_url = backend_url;
        }

        if let Ok(log_level) = std::env::var("RUST_LOG") {
            self.logging.level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        let upstream = url::Url::parse(&self.upstream.base_url)
            .with_context(|| format!("Invalid upstream base URL '{}'", self.upstream.base_url))?;
        if !matches!(upstream.scheme(), "http" | "https") {
            anyhow::bail!(
                "Upstream base URL must be http or https, got '{}'",
                upstream.scheme()
            );
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        let is_filter_string = self.logging.level.contains('=') || self.logging.level.contains(',');
        if !is_filter_string && !valid_levels.contains(&level_lower.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        let valid_formats = ["pretty", "compact", "full"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log format '{}'. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            );
        }

        if !self.server.cors.allow_any_origin && self.server.cors.allowed_origins.is_empty() {
            anyhow::bail!("CORS: If allow_any_origin is false, allowed_origins must be specified");
        }

        Ok(())
    }

    /// The socket address the gateway binds to.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from((self.server.host, self.server.port))
    }

    /// The filter string handed to `tracing_subscriber::EnvFilter`.
    pub fn log_filter(&self) -> String {
        if self.logging.level.contains('=') || self.logging.level.contains(',') {
            self.logging.level.clone()
        } else {
            format!(
                "taskdeck_gateway={},tower_http={},{}",
                self.logging.level, self.logging.level, self.logging.level
            )
        }
    }

    /// The upstream URL for a proxied path, e.g. `/api/task/7`.
    pub fn upstream_url(&self, path: &str) -> String {
        format!("{}{}", self.upstream.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = GatewayConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_upstream_url_is_rejected() {
        let mut config = GatewayConfig::default();
        config.upstream.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.upstream.base_url = "ftp://files.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn upstream_url_joins_without_double_slashes() {
        let mut config = GatewayConfig::default();
        config.upstream.base_url = "http://localhost:8080/".to_string();
        assert_eq!(
            config.upstream_url("/api/task/7"),
            "http://localhost:8080/api/task/7"
        );
    }

    #[test]
    fn filter_strings_pass_level_validation() {
        let mut config = GatewayConfig::default();
        config.logging.level = "taskdeck_gateway=debug,info".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_filter(), "taskdeck_gateway=debug,info");

        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn restricted_cors_requires_origins() {
        let mut config = GatewayConfig::default();
        config.server.cors.allow_any_origin = false;
        assert!(config.validate().is_err());

        config.server.cors.allowed_origins = vec!["http://localhost:8000".to_string()];
        assert!(config.validate().is_ok());
    }
}
