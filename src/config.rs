//! Configuration management for the sentiment proxy
//!
//! Parses TOML configuration files, applies environment overrides, and
//! provides typed access to settings. Every section has defaults, so an
//! empty file (or no file at all) yields a runnable configuration.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// Environment variable overriding `backend.base_url`
pub const ENV_MODEL_SERVICE_URL: &str = "MODEL_SERVICE_URL";
/// Environment variable overriding `server.port`
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding `app.version`
pub const ENV_APP_VERSION: &str = "APP_VERSION";
/// Environment variable prepended to `credentials.search_paths`
pub const ENV_CREDENTIALS_PATH: &str = "MODEL_CREDENTIALS_PATH";
/// Environment variable overriding `observability.log_level`
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Upper bound for the outbound timeout
const MAX_TIMEOUT_SECONDS: u64 = 300;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body; larger bodies get HTTP 413
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Socket address to listen on
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host` is not an IP address.
    pub fn bind_addr(&self) -> AppResult<SocketAddr> {
        let ip: IpAddr = self.host.trim().parse().map_err(|e| {
            AppError::Config(format!(
                "server.host must be an IP address, got {:?}: {}",
                self.host, e
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_body_bytes() -> usize {
    32 * 1024 * 1024
}

/// Model service connection settings
///
/// Fields are private; use the accessors. `base_url()` never ends in `/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Whole-request timeout for a single outbound call
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds,
        }
    }

    /// Model service base URL without trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Outbound request timeout in seconds
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(default_base_url(), default_timeout_seconds())
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Application metadata
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Reported by `GET /version`
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_app_version(),
        }
    }
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Where to look for the model service credential
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    /// Tried in order; the first usable file wins
    #[serde(default = "crate::credentials::default_search_paths")]
    pub search_paths: Vec<PathBuf>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            search_paths: crate::credentials::default_search_paths(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();
        let config = Self::parse_file(path.as_ref())?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Load configuration for the server process
    ///
    /// Reads `path` if it exists (defaults otherwise), applies overrides from
    /// `lookup`, then validates. `lookup` is normally `std::env::var`.
    pub fn load<P, F>(path: P, lookup: F) -> AppResult<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let path_display = path.display().to_string();

        let mut config = if path.exists() {
            Self::parse_file(path)?
        } else {
            Self::default()
        };

        config.apply_overrides(lookup)?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    fn parse_file(path: &Path) -> AppResult<Self> {
        let path_display = path.display().to_string();

        let content =
            std::fs::read_to_string(path).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
            path: path_display,
            source,
        })
    }

    /// Apply environment-style overrides
    ///
    /// Unset or empty variables leave the file value in place.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_MODEL_SERVICE_URL) {
            self.backend.base_url = url.trim().to_string();
        }

        if let Some(port) = get(ENV_PORT) {
            self.server.port = port.trim().parse().map_err(|e| {
                AppError::Config(format!(
                    "{} must be a port number, got {:?}: {}",
                    ENV_PORT, port, e
                ))
            })?;
        }

        if let Some(version) = get(ENV_APP_VERSION) {
            self.app.version = version.trim().to_string();
        }

        if let Some(path) = get(ENV_CREDENTIALS_PATH) {
            self.credentials
                .search_paths
                .insert(0, PathBuf::from(path.trim()));
        }

        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.observability.log_level = level.trim().to_lowercase();
        }

        Ok(())
    }

    /// Validate configuration after parsing
    pub fn validate(&self) -> AppResult<()> {
        self.server.bind_addr()?;

        if self.server.max_body_bytes == 0 {
            return Err(AppError::Config(
                "server.max_body_bytes must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(AppError::Config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        let base_url = self.backend.base_url();
        if base_url.is_empty() {
            return Err(AppError::Config(
                "backend.base_url cannot be empty".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "backend.base_url must start with http:// or https://, got {:?}",
                base_url
            )));
        }

        let timeout = self.backend.timeout_seconds();
        if timeout == 0 {
            return Err(AppError::Config(
                "backend.timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if timeout > MAX_TIMEOUT_SECONDS {
            return Err(AppError::Config(format!(
                "backend.timeout_seconds cannot exceed {} seconds, got {}",
                MAX_TIMEOUT_SECONDS, timeout
            )));
        }

        if self.app.version.trim().is_empty() {
            return Err(AppError::Config("app.version cannot be empty".to_string()));
        }

        if !LOG_LEVELS.contains(&self.observability.log_level.as_str()) {
            return Err(AppError::Config(format!(
                "observability.log_level must be one of {:?}, got {:?}",
                LOG_LEVELS, self.observability.log_level
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().expect("defaults should validate");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.backend.base_url(), "http://localhost:8000");
        assert_eq!(config.backend.timeout_seconds(), 30);
        assert_eq!(config.app.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.credentials.search_paths.len(), 2);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [backend]
            base_url = "http://model-service:8000/"
            timeout_seconds = 10

            [app]
            version = "2.3.1"

            [credentials]
            search_paths = ["/tmp/key"]

            [observability]
            log_level = "debug"
            "#,
        )
        .expect("should parse");

        config.validate().expect("should validate");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.backend.base_url(), "http://model-service:8000");
        assert_eq!(config.backend.timeout_seconds(), 10);
        assert_eq!(config.app.version, "2.3.1");
        assert_eq!(config.credentials.search_paths, vec![PathBuf::from("/tmp/key")]);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                (ENV_MODEL_SERVICE_URL, "http://model:9000"),
                (ENV_PORT, "7000"),
                (ENV_APP_VERSION, "v9"),
                (ENV_LOG_LEVEL, "DEBUG"),
            ]))
            .expect("overrides should apply");

        assert_eq!(config.backend.base_url(), "http://model:9000");
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.app.version, "v9");
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_credentials_override_is_tried_first() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[(ENV_CREDENTIALS_PATH, "/custom/key")]))
            .unwrap();
        assert_eq!(config.credentials.search_paths[0], PathBuf::from("/custom/key"));
        assert_eq!(config.credentials.search_paths.len(), 3);
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[(ENV_MODEL_SERVICE_URL, "  ")]))
            .unwrap();
        assert_eq!(config.backend.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_invalid_port_override_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(env(&[(ENV_PORT, "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hostname_is_rejected_as_bind_host() {
        let mut config = Config::default();
        config.server.host = "localhost".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.host"));
        assert!(config.server.bind_addr().is_err());
    }

    #[test]
    fn test_bind_addr_uses_host_and_port() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 8081;
        config.validate().expect("loopback host is valid");
        assert_eq!(
            config.server.bind_addr().unwrap(),
            "127.0.0.1:8081".parse::<SocketAddr>().unwrap()
        );

        config.server.host = "::1".to_string();
        assert!(config.server.bind_addr().unwrap().is_ipv6());
    }

    #[test]
    fn test_load_emits_no_events() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use tracing_subscriber::layer::{Context, SubscriberExt};

        struct CountEvents(Arc<AtomicUsize>);

        impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CountEvents {
            fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        // Loading runs before telemetry::init, so any event here would be lost
        let events = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountEvents(events.clone()));
        let dir = tempfile::TempDir::new().unwrap();

        tracing::subscriber::with_default(subscriber, || {
            Config::load(
                dir.path().join("config.toml"),
                env(&[(ENV_MODEL_SERVICE_URL, "http://model:9000")]),
            )
            .expect("should load");
        });

        assert_eq!(events.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_body_limit_is_rejected() {
        let mut config = Config::default();
        config.server.max_body_bytes = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_body_bytes"));
    }

    #[test]
    fn test_base_url_without_scheme_is_rejected() {
        let mut config = Config::default();
        config.backend = BackendConfig::new("model-service:8000", 30);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = Config::default();
        config.backend = BackendConfig::new("http://x", 0);
        assert!(config.validate().is_err());

        config.backend = BackendConfig::new("http://x", 301);
        assert!(config.validate().is_err());

        config.backend = BackendConfig::new("http://x", 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let mut config = Config::default();
        config.observability.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_without_file_uses_defaults_and_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("config.toml");

        let config = Config::load(&missing, env(&[(ENV_PORT, "6001")])).expect("should load");
        assert_eq!(config.server.port, 6001);
        assert_eq!(config.backend.base_url(), "http://localhost:8000");
    }
}
