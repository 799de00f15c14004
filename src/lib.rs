//! Salud al Paso backend library
//!
//! REST service for emergency reports, medical appointments, consultations
//! and static health tips, backed by a schema-less document store.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

pub use error::AppError;

/// Application configuration
pub mod config {
    use serde::Deserialize;

    use crate::services::DEFAULT_LIST_LIMIT;

    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(default)]
    pub struct Config {
        pub server: ServerConfig,
        pub api: ApiConfig,
        pub database: DatabaseConfig,
        pub logging: LoggingConfig,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(default)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                host: "0.0.0.0".into(),
                port: 8001,
            }
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(default)]
    pub struct ApiConfig {
        /// Path prefix shared by every route.
        pub prefix: String,
        /// Cap on documents returned by list endpoints.
        pub list_limit: usize,
    }

    impl Default for ApiConfig {
        fn default() -> Self {
            Self {
                prefix: "/api".into(),
                list_limit: DEFAULT_LIST_LIMIT,
            }
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(default)]
    pub struct DatabaseConfig {
        /// `sqlite:` URL, or `memory://` for a process-local store.
        pub url: String,
        pub max_connections: u32,
        /// Per-call timeout for store operations.
        pub timeout_ms: u64,
        /// Retries after the first attempt, transient failures only.
        pub retry_attempts: usize,
        pub retry_base_ms: u64,
    }

    impl Default for DatabaseConfig {
        fn default() -> Self {
            Self {
                url: "sqlite://salud.db?mode=rwc".into(),
                max_connections: 5,
                timeout_ms: 5_000,
                retry_attempts: 2,
                retry_base_ms: 10,
            }
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(default)]
    pub struct LoggingConfig {
        /// Filter directive used when `RUST_LOG` is unset.
        pub level: String,
        pub json: bool,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: "info".into(),
                json: false,
            }
        }
    }

    /// Load configuration from file
    pub fn load_config() -> Result<Config, ::config::ConfigError> {
        // Override with environment-specific settings
        let env = std::env::var("SALUD_ENV").unwrap_or_else(|_| "development".into());

        ::config::Config::builder()
            .add_source(::config::File::with_name("config/default").required(false))
            .add_source(::config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables, e.g. SALUD__DATABASE__URL
            .add_source(
                ::config::Environment::with_prefix("SALUD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

}
