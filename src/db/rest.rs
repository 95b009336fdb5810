//! PostgREST client for the hosted datastore.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::{Datastore, SelectQuery};
use crate::errors::AppError;

/// Header carrying the project's public key.
pub const API_KEY_HEADER: &str = "apikey";

/// Error body returned by PostgREST on failure.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

impl PostgrestError {
    fn describe(&self) -> String {
        let mut text = self.message.clone();
        if let Some(code) = &self.code {
            text.push_str(&format!(" [{}]", code));
        }
        if let Some(details) = &self.details {
            text.push_str(&format!(": {}", details));
        }
        if let Some(hint) = &self.hint {
            text.push_str(&format!(" (hint: {})", hint));
        }
        text
    }
}

/// HTTP client for the datastore's REST and RPC endpoints.
///
/// Uses the HTTP client's default timeouts; nothing is retried.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
}

impl RestClient {
    /// Create a client for the project at `url`, authenticating with the public `key`.
    pub fn new(url: &str, key: &str) -> Result<Self, AppError> {
        let url = url.trim().trim_end_matches('/');
        let key = key.trim();
        if url.is_empty() || key.is_empty() {
            return Err(AppError::Configuration(
                "Missing Supabase environment variables".to_string(),
            ));
        }

        let invalid_key =
            |_| AppError::Configuration("Supabase key is not a valid header value".to_string());
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(key).map_err(invalid_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid_key)?,
        );

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: format!("{}/rest/v1", url),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rpc/{}", self.base_url, function)
    }
}

#[async_trait]
impl Datastore for RestClient {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, AppError> {
        tracing::debug!(table = %query.table, select = %query.select_clause(), "datastore select");

        let response = self
            .http
            .get(self.table_url(&query.table))
            .query(&query.to_query_pairs())
            .send()
            .await?;

        let rows = check(response).await?.json::<Vec<Value>>().await?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<(), AppError> {
        tracing::debug!(table = %table, count = rows.len(), "datastore insert");

        let response = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    async fn rpc(&self, function: &str, params: Value) -> Result<Value, AppError> {
        tracing::debug!(function = %function, "datastore rpc");

        let response = self
            .http
            .post(self.rpc_url(function))
            .json(&params)
            .send()
            .await?;

        let body = check(response).await?.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Pass successful responses through; map failures onto the error taxonomy.
async fn check(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<PostgrestError>(&body) {
        Ok(err) => err.describe(),
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => body,
    };

    tracing::warn!(status = %status, "datastore request rejected: {}", message);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Datastore(format!("{} ({})", message, status)),
    })
}
