//! Configuration and constants.
//!
//! The listening address and the upstream endpoint are fixed constants. Only
//! ambient settings (log filter, log format, upstream timeout) can be adjusted
//! from the command line. `AppConfig` is the root configuration struct.

use std::net::SocketAddr;
use std::time::Duration;

use const_format::formatcp;

// =============================================================================
// Inbound listener
// =============================================================================

/// Interface the relay listens on
pub const LISTEN_HOST: &str = "0.0.0.0";

/// Port the relay listens on
pub const LISTEN_PORT: u16 = 8081;

/// Graceful shutdown window for in-flight requests, in seconds
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// Upstream service
// =============================================================================

/// Environment variable holding the upstream host name or IP
pub const UPSTREAM_HOST_ENV: &str = "HOST";

/// Upstream port
pub const UPSTREAM_PORT: u16 = 80;

/// Upstream path
pub const UPSTREAM_PATH: &str = "/vert.x";

/// Total timeout for one upstream exchange, in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Header carrying the request ID, both in responses and toward the upstream
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Relayed responses are produced fresh for every call
pub const CACHE_CONTROL_RELAY: &str = "no-store";

// =============================================================================
// Logging
// =============================================================================

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME"));

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Inbound listener
    pub http: HttpServerConfig,
    /// Outbound call target
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_grace: Duration,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: LISTEN_HOST.to_string(),
            port: LISTEN_PORT,
            shutdown_grace: Duration::from_secs(SHUTDOWN_GRACE_SECS),
        }
    }
}

/// Where and how the relay reaches the upstream service.
///
/// The binary always uses the defaults; the fields exist so a test harness
/// can point the client at a local server on an ephemeral port.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Environment variable consulted on every request for the host
    pub host_env: String,
    pub port: u16,
    pub path: String,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host_env: UPSTREAM_HOST_ENV.to_string(),
            port: UPSTREAM_PORT,
            path: UPSTREAM_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Validation(format!(
                "Unknown log format '{}', expected 'text' or 'json'",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// EnvFilter directive string
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Resolve the filter with priority: CLI > RUST_LOG > default
    pub fn resolve_filter(cli: Option<String>) -> String {
        cli.or_else(|| std::env::var("RUST_LOG").ok())
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
    }
}

impl AppConfig {
    /// Build the configuration from command-line overrides on top of the constants.
    pub fn load(
        log_level: Option<String>,
        log_format: &str,
        upstream_timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();
        config.logging.filter = LoggingConfig::resolve_filter(log_level);
        config.logging.format = log_format.parse()?;
        config.upstream.timeout = Duration::from_secs(upstream_timeout_secs);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.timeout.is_zero() {
            return Err(ConfigError::Validation(
                "Upstream timeout must be at least one second".to_string(),
            ));
        }
        if self.upstream.host_env.is_empty() {
            return Err(ConfigError::Validation(
                "Upstream host environment variable name is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Socket address of the inbound listener
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(format!("{}:{}", self.http.host, self.http.port).parse()?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid listen address: {0}")]
    Addr(#[from] std::net::AddrParseError),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_endpoints() {
        let config = AppConfig::default();
        assert_eq!(config.listen_addr().unwrap(), SocketAddr::from(([0, 0, 0, 0], 8081)));
        assert_eq!(config.upstream.host_env, "HOST");
        assert_eq!(config.upstream.port, 80);
        assert_eq!(config.upstream.path, "/vert.x");
        assert_eq!(config.upstream.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_default_log_filter_names_crate() {
        assert_eq!(DEFAULT_LOG_FILTER, "hello_consumer=debug,tower_http=debug");
    }

    #[test]
    fn test_load_applies_overrides() {
        let config = AppConfig::load(Some("warn".to_string()), "JSON", 5).unwrap();
        assert_eq!(config.logging.filter, "warn");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.upstream.timeout, Duration::from_secs(5));
        // Overrides never move the listener or the upstream endpoint
        assert_eq!(config.http.port, LISTEN_PORT);
        assert_eq!(config.upstream.port, UPSTREAM_PORT);
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let err = AppConfig::load(Some("info".to_string()), "text", 0).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_rejects_unknown_log_format() {
        let err = AppConfig::load(Some("info".to_string()), "xml", 30).unwrap_err();
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_bad_listen_host_is_reported() {
        let mut config = AppConfig::default();
        config.http.host = "not an address".to_string();
        assert!(matches!(config.listen_addr(), Err(ConfigError::Addr(_))));
    }

    #[test]
    fn test_cli_filter_wins() {
        assert_eq!(
            LoggingConfig::resolve_filter(Some("trace".to_string())),
            "trace"
        );
    }
}
