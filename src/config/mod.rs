//! Configuration module for the campus hub backend.
//!
//! Configuration is loaded from environment variables. The datastore endpoint and public
//! key are required; everything else has a default.

use std::env;
use std::net::SocketAddr;

use crate::errors::AppError;

/// Environment keys for the datastore endpoint, in lookup order.
const URL_KEYS: [&str; 2] = ["SUPABASE_URL", "VITE_SUPABASE_URL"];
/// Environment keys for the datastore public key, in lookup order.
const KEY_KEYS: [&str; 2] = ["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted datastore
    pub datastore_url: String,
    /// Public (anon) API key for the hosted datastore
    pub datastore_key: String,
    /// Pre-shared key guarding the HTTP API
    pub api_psk: Option<String>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from the process environment (and a `.env` file if present).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_present = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(*key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let (Some(datastore_url), Some(datastore_key)) =
            (first_present(&URL_KEYS), first_present(&KEY_KEYS))
        else {
            return Err(AppError::Configuration(
                "Missing Supabase environment variables".to_string(),
            ));
        };

        let api_psk = lookup("CAMPUS_API_PSK").filter(|psk| !psk.is_empty());

        let bind_addr = lookup("CAMPUS_BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let bind_addr = bind_addr.parse().map_err(|_| {
            AppError::Configuration(format!("Invalid CAMPUS_BIND_ADDR format: {}", bind_addr))
        })?;

        let log_level = lookup("CAMPUS_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            datastore_url,
            datastore_key,
            api_psk,
            bind_addr,
            log_level,
        })
    }
}
