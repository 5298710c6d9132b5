//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use serde::Deserialize;
use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Admin API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_pool_size: usize,
    pub require_tls: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
            max_pool_size: 10,
            require_tls: false,
        }
    }
}

/// Chain node (REST gateway) configuration
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub lcd_url: String,
    pub timeout: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            lcd_url: "http://localhost:1317".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Periodic refresh configuration. `None` disables a job.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub tally_interval: Option<Duration>,
    pub snapshot_interval: Option<Duration>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            tally_interval: Some(Duration::from_secs(300)),
            snapshot_interval: Some(Duration::from_secs(300)),
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub node: NodeConfig,
    pub refresh: RefreshConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let server = ServerConfig {
            host: std::env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        // Try to load DATABASE_URL first, fall back to individual vars
        let database = if let Ok(database_url) = std::env::var("DATABASE_URL") {
            Self::parse_database_url(&database_url)?
        } else {
            DatabaseConfig {
                host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: std::env::var("DB_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(5432),
                user: std::env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
                password: std::env::var("DB_PASSWORD").unwrap_or_default(),
                database: std::env::var("DB_NAME").unwrap_or_else(|_| "postgres".to_string()),
                max_pool_size: max_pool_size(),
                require_tls: false,
            }
        };

        let node = NodeConfig {
            lcd_url: match std::env::var("NODE_LCD_URL") {
                Ok(raw) => {
                    url::Url::parse(&raw).map_err(|e| {
                        ConfigError::InvalidValue(format!("Invalid NODE_LCD_URL {}: {}", raw, e))
                    })?;
                    raw.trim_end_matches('/').to_string()
                }
                Err(_) => NodeConfig::default().lcd_url,
            },
            timeout: std::env::var("NODE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or_else(|| NodeConfig::default().timeout),
        };

        let defaults = RefreshConfig::default();
        let refresh = RefreshConfig {
            tally_interval: parse_interval("TALLY_REFRESH_SECS", defaults.tally_interval)?,
            snapshot_interval: parse_interval("SNAPSHOT_REFRESH_SECS", defaults.snapshot_interval)?,
        };

        Ok(Self {
            server,
            database,
            node,
            refresh,
        })
    }

    /// Parse a DATABASE_URL connection string (postgresql://...)
    fn parse_database_url(url: &str) -> Result<DatabaseConfig, ConfigError> {
        match url::Url::parse(url) {
            Ok(parsed) => {
                let host = parsed.host_str()
                    .ok_or_else(|| ConfigError::InvalidValue("Missing host in DATABASE_URL".to_string()))?
                    .to_string();

                let port = parsed.port().unwrap_or(5432);

                let user = parsed.username().to_string();
                let password = parsed.password()
                    .map(|p| p.to_string())
                    .unwrap_or_default();

                let database = parsed.path()
                    .trim_start_matches('/')
                    .to_string();

                let require_tls = parsed
                    .query_pairs()
                    .any(|(k, v)| k == "sslmode" && v == "require");

                Ok(DatabaseConfig {
                    host,
                    port,
                    user,
                    password,
                    database,
                    max_pool_size: max_pool_size(),
                    require_tls,
                })
            }
            Err(_) => Err(ConfigError::InvalidValue(
                "Invalid DATABASE_URL format (expected postgresql://...)".to_string()
            ))
        }
    }
}

fn max_pool_size() -> usize {
    std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10)
}

/// Seconds from the environment; `0` turns the job off
fn parse_interval(var: &str, default: Option<Duration>) -> Result<Option<Duration>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ConfigError::InvalidValue(format!("{} must be a number of seconds, got {:?}", var, raw))
            })?;
            Ok((secs > 0).then(|| Duration::from_secs(secs)))
        }
        Err(_) => Ok(default),
    }
}
