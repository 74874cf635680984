use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// PostgreSQL connection string; startup is fatal without it
    pub database_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Deployment environment name, reported by /ping and gating 500 details
    #[serde(default = "default_environment")]
    pub environment: String,

    /// HTTP server host
    #[serde(default = "default_http_host")]
    pub http_host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Maximum PostgreSQL pool size
    #[serde(default = "default_postgres_max_pool_size")]
    pub postgres_max_pool_size: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    3000
}

fn default_postgres_max_pool_size() -> usize {
    10
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("DEVICEHUB"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure tests run serially and don't interfere with each other
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_applied() {
        let _lock = TEST_LOCK.lock().unwrap();

        std::env::set_var("DEVICEHUB_DATABASE_URL", "postgres://localhost/devicehub");
        std::env::remove_var("DEVICEHUB_LOG_LEVEL");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.environment, "development");
        assert_eq!(config.http_port, 3000);

        std::env::remove_var("DEVICEHUB_DATABASE_URL");
    }

    #[test]
    fn test_missing_database_url_is_an_error() {
        let _lock = TEST_LOCK.lock().unwrap();

        std::env::remove_var("DEVICEHUB_DATABASE_URL");

        let result = ServiceConfig::from_env();
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_values() {
        let _lock = TEST_LOCK.lock().unwrap();

        std::env::set_var("DEVICEHUB_DATABASE_URL", "postgres://localhost/devicehub");
        std::env::set_var("DEVICEHUB_ENVIRONMENT", "production");
        std::env::set_var("DEVICEHUB_HTTP_PORT", "8080");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.environment, "production");
        assert_eq!(config.http_port, 8080);

        std::env::remove_var("DEVICEHUB_DATABASE_URL");
        std::env::remove_var("DEVICEHUB_ENVIRONMENT");
        std::env::remove_var("DEVICEHUB_HTTP_PORT");
    }
}
