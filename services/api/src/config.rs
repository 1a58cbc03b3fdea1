//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use reqwest::Url;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which provider implementations back the services.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Local providers over a key-value store with synthetic data.
    Mock,
    /// REST client providers against a remote GeoWatch API.
    Http,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mock" | "local" => Ok(Backend::Mock),
            "http" | "remote" => Ok(Backend::Http),
            other => Err(format!("'{}' is not one of mock, http", other)),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub backend: Backend,
    pub api_base_url: Url,
    /// redb file for the local store; in-memory when unset.
    pub store_path: Option<PathBuf>,
    pub simulated_latency: bool,
    pub rng_seed: Option<u64>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Provider Selection ---
        let backend = match lookup("GEOWATCH_BACKEND") {
            Some(value) => value
                .parse::<Backend>()
                .map_err(|e| ConfigError::InvalidValue("GEOWATCH_BACKEND".to_string(), e))?,
            None => Backend::Mock,
        };

        let api_url_str = lookup("GEOWATCH_API_URL")
            .unwrap_or_else(|| "http://localhost:8000/api/geowatch".to_string());
        let api_base_url = Url::parse(api_url_str.trim_end_matches('/'))
            .map_err(|e| ConfigError::InvalidValue("GEOWATCH_API_URL".to_string(), e.to_string()))?;
        if api_base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue(
                "GEOWATCH_API_URL".to_string(),
                format!("'{}' cannot carry a path", api_url_str),
            ));
        }

        // --- Local Provider Settings ---
        let store_path = lookup("GEOWATCH_STORE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let simulated_latency = match lookup("GEOWATCH_SIMULATED_LATENCY") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "GEOWATCH_SIMULATED_LATENCY".to_string(),
                    format!("'{}' is not a boolean", value),
                )
            })?,
            None => true,
        };

        let rng_seed = lookup("GEOWATCH_RNG_SEED")
            .map(|value| {
                value.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidValue("GEOWATCH_RNG_SEED".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            bind_address,
            log_level,
            backend,
            api_base_url,
            store_path,
            simulated_latency,
            rng_seed,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
