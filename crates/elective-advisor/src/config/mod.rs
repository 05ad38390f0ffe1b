use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub model: ModelServiceConfig,
    pub auth: AuthConfig,
    pub catalog: CatalogConfig,
    pub history: HistoryBackend,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "4000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let base_url =
            env::var("MODEL_SERVICE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        let timeout_ms = env::var("MODEL_TIMEOUT_MS")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "dev_secret".to_string());

        let syllabus_path = PathBuf::from(
            env::var("SYLLABUS_PATH").unwrap_or_else(|_| "data/syllabus.json".to_string()),
        );

        let history = match env::var("HISTORY_DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => HistoryBackend::Remote { database_url: url },
            _ => HistoryBackend::LocalFile {
                path: PathBuf::from(
                    env::var("HISTORY_PATH").unwrap_or_else(|_| "data/history.json".to_string()),
                ),
            },
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            model: ModelServiceConfig {
                base_url,
                timeout: Duration::from_millis(timeout_ms),
            },
            auth: AuthConfig { jwt_secret },
            catalog: CatalogConfig { syllabus_path },
            history,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Remote model service connection settings. The timeout bounds how long a
/// request waits before the orchestrator moves on to the heuristic tier.
#[derive(Debug, Clone)]
pub struct ModelServiceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Signing key for service-issued session tokens.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Where the elective catalog is read from.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub syllabus_path: PathBuf,
}

/// History persistence backend, selected once at process start. Setting
/// `HISTORY_DATABASE_URL` opts into the remote relational store; otherwise
/// history lives in a local JSON file.
#[derive(Debug, Clone)]
pub enum HistoryBackend {
    Remote { database_url: String },
    LocalFile { path: PathBuf },
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidTimeout,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidTimeout => {
                write!(f, "MODEL_TIMEOUT_MS must be a duration in milliseconds")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("MODEL_SERVICE_URL");
        env::remove_var("MODEL_TIMEOUT_MS");
        env::remove_var("JWT_SECRET");
        env::remove_var("SYLLABUS_PATH");
        env::remove_var("HISTORY_DATABASE_URL");
        env::remove_var("HISTORY_PATH");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.model.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.model.timeout, Duration::from_millis(3000));
        assert!(matches!(config.history, HistoryBackend::LocalFile { .. }));
    }

    #[test]
    fn database_url_selects_remote_history() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("HISTORY_DATABASE_URL", "postgres://advisor@db/history");
        let config = AppConfig::load().expect("config loads");
        assert!(matches!(
            config.history,
            HistoryBackend::Remote { ref database_url } if database_url.starts_with("postgres://")
        ));
        env::remove_var("HISTORY_DATABASE_URL");
    }

    #[test]
    fn blank_database_url_falls_back_to_file() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("HISTORY_DATABASE_URL", "  ");
        env::set_var("HISTORY_PATH", "/tmp/advisor-history.json");
        let config = AppConfig::load().expect("config loads");
        assert!(matches!(
            config.history,
            HistoryBackend::LocalFile { ref path } if path.ends_with("advisor-history.json")
        ));
        env::remove_var("HISTORY_DATABASE_URL");
        env::remove_var("HISTORY_PATH");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 4000));
        env::remove_var("APP_HOST");
    }

    #[test]
    fn rejects_malformed_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MODEL_TIMEOUT_MS", "soon");
        let result = AppConfig::load();
        assert!(matches!(result, Err(ConfigError::InvalidTimeout)));
        env::remove_var("MODEL_TIMEOUT_MS");
    }
}
