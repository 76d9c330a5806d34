/// Service configuration module
/// Reads storage, listener and athlete-limit settings from the environment

use std::env;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::info;

use crate::validation::pipeline::{
    ValidationLimits, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WEIGHT, DEFAULT_NAME_MAX_LENGTH,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid storage backend: {0}")]
    InvalidBackend(String),
    #[error("Missing environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Where entities are persisted
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Postgres {
        connection_string: String,
        max_connections: u32,
    },
    Memory,
}

/// Service configuration combining all settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub bind_addr: SocketAddr,
    pub limits: ValidationLimits,
}

fn parse_var<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidConfig(format!("Invalid {}: {} ({})", key, raw, e)))
}

fn positive_limit(key: &str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidConfig(format!(
            "{} must be a positive number, got {}",
            key, value
        )));
    }
    Ok(value)
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("STORAGE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .to_lowercase();

        let storage = match backend.as_str() {
            "postgres" => {
                let connection_string = lookup("DATABASE_URL")
                    .ok_or_else(|| ConfigError::MissingEnv("DATABASE_URL".to_string()))?;
                let max_connections: u32 = parse_var(&lookup, "DB_MAX_CONNECTIONS", "5")?;
                if max_connections == 0 {
                    return Err(ConfigError::InvalidConfig(
                        "DB_MAX_CONNECTIONS must be at least 1".to_string(),
                    ));
                }
                StorageBackend::Postgres {
                    connection_string,
                    max_connections,
                }
            }
            "memory" => StorageBackend::Memory,
            other => return Err(ConfigError::InvalidBackend(other.to_string())),
        };

        let bind_addr: SocketAddr = parse_var(&lookup, "API_BIND_ADDR", "0.0.0.0:8000")?;

        let max_weight = positive_limit(
            "ATHLETE_MAX_WEIGHT",
            parse_var(&lookup, "ATHLETE_MAX_WEIGHT", &DEFAULT_MAX_WEIGHT.to_string())?,
        )?;
        let max_height = positive_limit(
            "ATHLETE_MAX_HEIGHT",
            parse_var(&lookup, "ATHLETE_MAX_HEIGHT", &DEFAULT_MAX_HEIGHT.to_string())?,
        )?;
        let name_max_length: usize = parse_var(
            &lookup,
            "ATHLETE_NAME_MAX_LENGTH",
            &DEFAULT_NAME_MAX_LENGTH.to_string(),
        )?;
        if name_max_length == 0 {
            return Err(ConfigError::InvalidConfig(
                "ATHLETE_NAME_MAX_LENGTH must be at least 1".to_string(),
            ));
        }

        let limits = ValidationLimits {
            max_weight,
            max_height,
            name_max_length,
        };

        info!(
            "Configuration loaded: backend={}, bind={}, max_weight={}, max_height={}, name_max_length={}",
            backend, bind_addr, limits.max_weight, limits.max_height, limits.name_max_length
        );

        Ok(AppConfig {
            storage,
            bind_addr,
            limits,
        })
    }
}
