//! Configuration module
//!
//! Configuration is layered, lowest precedence first:
//! 1. Built-in defaults
//! 2. `config/{environment}.toml` (optional)
//! 3. `PV__SECTION__FIELD` environment variables
//! 4. Conventional variables (`REDIS_URL`, `REDIS_TOKEN`, `SERVER_HOST`, `SERVER_PORT`, `PV_BACKEND`)

pub mod cache;
pub mod environment;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::env;

pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use verification::VerificationConfig;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Which key-value backend the service runs against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Redis server (production)
    #[default]
    Redis,
    /// Process-local map; state is lost on restart
    Memory,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(BackendKind::Redis),
            "memory" | "in-memory" => Ok(BackendKind::Memory),
            _ => Err(format!("Invalid backend: {}", s)),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment
    pub environment: Environment,

    /// Backend selection
    pub backend: BackendKind,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Verification key layout
    pub verification: VerificationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the environment named by `ENVIRONMENT`
    pub fn load() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        dotenvy::from_filename(environment.env_file()).ok();
        dotenvy::dotenv().ok();

        let file = config::File::with_name(environment.config_file()).required(false);
        let mut app_config = Self::layered(environment, file)?;
        app_config.apply_env_overrides()?;

        Ok(app_config)
    }

    /// Defaults, then `file`, then `PV__*` variables
    ///
    /// Per-environment logging defaults sit below the file so a `[logging]`
    /// section in it wins.
    fn layered<S>(environment: Environment, file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let logging = LoggingConfig::for_environment(environment);

        let settings = config::Config::builder()
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", logging.format.as_str())?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("PV")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = settings.try_deserialize()?;
        app_config.environment = environment;

        Ok(app_config)
    }

    /// Apply the conventional, un-prefixed environment variables
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("REDIS_URL") {
            self.cache.url = url;
        }
        if let Ok(token) = env::var("REDIS_TOKEN") {
            self.cache.token = Some(token);
        }
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Ok(backend) = env::var("PV_BACKEND") {
            self.backend = backend.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PV_BACKEND".to_string(),
                value: backend.clone(),
            })?;
        }
        if let Ok(level) = env::var("RUST_LOG") {
            self.logging.level = level;
        }
        Ok(())
    }
}
