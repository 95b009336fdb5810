//! Data access for the hosted datastore.
//!
//! The hosted datastore is the source of truth for all application data. Everything
//! goes through the [`Datastore`] contract so handlers and views can run against the
//! REST client in production and an in-memory store in tests.

#[cfg(test)]
pub mod memory;
mod query;
mod repository;
mod rest;

pub use query::*;
pub use repository::*;
pub use rest::*;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::errors::AppError;

/// Table and procedure names in the hosted datastore.
pub mod tables {
    pub const PROFILES: &str = "profiles";
    pub const RESOURCES: &str = "resources";
    pub const TEAM_REQUESTS: &str = "team_requests";
    pub const LIKES: &str = "likes";

    pub const INCREMENT_DOWNLOADS: &str = "increment_downloads";
}

/// The read / insert / invoke surface of the hosted datastore.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Read rows as JSON objects.
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, AppError>;

    /// Insert rows into a table.
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<(), AppError>;

    /// Invoke a named remote procedure.
    async fn rpc(&self, function: &str, params: Value) -> Result<Value, AppError>;
}

/// Build the process-wide datastore handle from configuration.
pub fn connect(config: &Config) -> Result<Arc<dyn Datastore>, AppError> {
    let client = RestClient::new(&config.datastore_url, &config.datastore_key)?;
    Ok(Arc::new(client))
}
