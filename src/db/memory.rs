//! In-memory datastore for tests.
//!
//! Holds tables of JSON rows and answers the same read / insert / invoke contract as the
//! REST client. Every call is recorded, failures can be injected per operation, and
//! unique constraints can be declared to mimic the hosted schema.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use super::{tables, Column, Datastore, Embed, SelectQuery};
use crate::errors::AppError;

/// Kind of datastore operation, used for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Rpc,
}

/// A recorded datastore call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Select { table: String },
    Insert { table: String, rows: Vec<Value> },
    Rpc { function: String, params: Value },
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::Select { .. } => Operation::Select,
            Call::Insert { .. } => Operation::Insert,
            Call::Rpc { .. } => Operation::Rpc,
        }
    }
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    failures: HashMap<Operation, AppError>,
    unique: HashMap<String, Vec<String>>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct MemoryDatastore {
    inner: Mutex<Inner>,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or extend) a table with the given rows.
    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        self.seed(table, rows);
        self
    }

    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut inner = self.inner.lock().unwrap();
        inner.tables.entry(table.to_string()).or_default().extend(rows);
    }

    /// Make every subsequent call of `operation` fail with `error`.
    pub fn fail(&self, operation: Operation, error: AppError) {
        self.inner.lock().unwrap().failures.insert(operation, error);
    }

    pub fn clear_failure(&self, operation: Operation) {
        self.inner.lock().unwrap().failures.remove(&operation);
    }

    /// Reject inserts that duplicate an existing row on `columns`.
    pub fn unique(&self, table: &str, columns: &[&str]) {
        self.inner.lock().unwrap().unique.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn count(&self, operation: Operation) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.inner
            .lock()
            .unwrap()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Datastore for MemoryDatastore {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Select {
            table: query.table.clone(),
        });
        if let Some(err) = inner.failures.get(&Operation::Select) {
            return Err(err.clone());
        }

        let rows = inner
            .tables
            .get(&query.table)
            .ok_or_else(|| missing_table(&query.table))?;

        let mut matched: Vec<&Value> = rows
            .iter()
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|(column, value)| row.get(column).map(value_text) == Some(value.clone()))
            })
            .collect();

        if let Some(order) = &query.order {
            matched.sort_by(|a, b| {
                let ordering = compare_values(&a[&order.column], &b[&order.column]);
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        Ok(matched
            .into_iter()
            .map(|row| project(row, &query.columns, &inner.tables))
            .collect())
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Insert {
            table: table.to_string(),
            rows: rows.clone(),
        });
        if let Some(err) = inner.failures.get(&Operation::Insert) {
            return Err(err.clone());
        }

        let unique = inner.unique.get(table).cloned();
        let existing = inner
            .tables
            .get_mut(table)
            .ok_or_else(|| missing_table(table))?;

        if let Some(columns) = unique {
            for (i, row) in rows.iter().enumerate() {
                let clashes = existing
                    .iter()
                    .chain(rows[..i].iter())
                    .any(|other| columns.iter().all(|c| other.get(c) == row.get(c)));
                if clashes {
                    return Err(AppError::Conflict(format!(
                        "duplicate key value violates unique constraint on {} ({})",
                        table,
                        columns.join(", ")
                    )));
                }
            }
        }

        existing.extend(rows);
        Ok(())
    }

    async fn rpc(&self, function: &str, params: Value) -> Result<Value, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Rpc {
            function: function.to_string(),
            params: params.clone(),
        });
        if let Some(err) = inner.failures.get(&Operation::Rpc) {
            return Err(err.clone());
        }

        match function {
            tables::INCREMENT_DOWNLOADS => {
                let id = params
                    .get("resource_id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| AppError::Validation("resource_id is required".to_string()))?;
                let resources = inner
                    .tables
                    .get_mut(tables::RESOURCES)
                    .ok_or_else(|| missing_table(tables::RESOURCES))?;
                for row in resources.iter_mut() {
                    if row.get("id").and_then(Value::as_str) == Some(id) {
                        let current = row.get("downloads").and_then(Value::as_u64).unwrap_or(0);
                        row["downloads"] = Value::from(current + 1);
                    }
                }
                Ok(Value::Null)
            }
            _ => Err(AppError::NotFound(format!(
                "Could not find the function public.{}",
                function
            ))),
        }
    }
}

fn missing_table(table: &str) -> AppError {
    AppError::NotFound(format!("relation \"public.{}\" does not exist", table))
}

/// Render a scalar the way it appears in a filter value.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Order timestamps chronologically, numbers numerically, other strings lexically.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => {
            match (
                DateTime::<FixedOffset>::parse_from_rfc3339(a),
                DateTime::<FixedOffset>::parse_from_rfc3339(b),
            ) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn project(row: &Value, columns: &[Column], tables: &HashMap<String, Vec<Value>>) -> Value {
    let source = row.as_object().cloned().unwrap_or_default();
    if columns.is_empty() {
        return Value::Object(source);
    }

    let mut out = Map::new();
    for column in columns {
        match column {
            Column::All => out.extend(source.clone()),
            Column::Named(name) => {
                out.insert(name.clone(), source.get(name).cloned().unwrap_or(Value::Null));
            }
            Column::Embed(embed) => {
                out.insert(embed.alias.clone(), resolve_embed(row, embed, tables));
            }
        }
    }
    Value::Object(out)
}

fn resolve_embed(row: &Value, embed: &Embed, tables: &HashMap<String, Vec<Value>>) -> Value {
    let Some(key) = row.get(&embed.foreign_key) else {
        return Value::Null;
    };
    let related = tables
        .get(&embed.table)
        .and_then(|rows| rows.iter().find(|candidate| candidate.get("id") == Some(key)));

    match related {
        Some(related) => {
            let fields = embed
                .columns
                .iter()
                .map(|c| (c.clone(), related.get(c).cloned().unwrap_or(Value::Null)))
                .collect();
            Value::Object(fields)
        }
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MemoryDatastore {
        MemoryDatastore::new()
            .with_rows(
                tables::PROFILES,
                vec![json!({ "id": "u1", "full_name": "Ada", "avatar_url": null, "email": "a@x" })],
            )
            .with_rows(
                tables::RESOURCES,
                vec![
                    json!({ "id": "r1", "user_id": "u1", "downloads": 2, "created_at": "2024-01-01T00:00:00Z" }),
                    json!({ "id": "r2", "user_id": "ghost", "downloads": null, "created_at": "2024-03-01T00:00:00+02:00" }),
                    json!({ "id": "r3", "user_id": "u1", "downloads": 0, "created_at": "2024-02-01T00:00:00Z" }),
                ],
            )
            .with_rows(tables::LIKES, vec![])
    }

    #[tokio::test]
    async fn test_select_orders_and_embeds() {
        let store = store();
        let query = SelectQuery::from(tables::RESOURCES)
            .all_columns()
            .embed(Embed::owner_profile())
            .order("created_at", false);

        let rows = store.select(&query).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["r2", "r3", "r1"]);
        assert_eq!(rows[1]["profiles"], json!({ "full_name": "Ada", "avatar_url": null }));
        assert_eq!(rows[0]["profiles"], Value::Null);
        assert!(rows[0].get("email").is_none());
    }

    #[tokio::test]
    async fn test_select_filter_and_limit() {
        let store = store();
        let query = SelectQuery::from(tables::RESOURCES)
            .column("id")
            .eq("user_id", "u1")
            .order("created_at", true)
            .limit(1);

        let rows = store.select(&query).await.unwrap();
        assert_eq!(rows, vec![json!({ "id": "r1" })]);
    }

    #[tokio::test]
    async fn test_unknown_table_and_function() {
        let store = store();
        assert!(matches!(
            store.select(&SelectQuery::from("nope")).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.rpc("nope", json!({})).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_increment_downloads_treats_null_as_zero() {
        let store = store();
        store
            .rpc(tables::INCREMENT_DOWNLOADS, json!({ "resource_id": "r2" }))
            .await
            .unwrap();
        store
            .rpc(tables::INCREMENT_DOWNLOADS, json!({ "resource_id": "r1" }))
            .await
            .unwrap();

        let rows = store.rows(tables::RESOURCES);
        assert_eq!(rows[0]["downloads"], 3);
        assert_eq!(rows[1]["downloads"], 1);
        assert_eq!(store.count(Operation::Rpc), 2);
    }

    #[tokio::test]
    async fn test_unique_constraint_and_failure_injection() {
        let store = store();
        store.unique(tables::LIKES, &["user_id", "resource_id"]);
        let like = json!({ "user_id": "u1", "resource_id": "r1" });

        store.insert(tables::LIKES, vec![like.clone()]).await.unwrap();
        let err = store.insert(tables::LIKES, vec![like]).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.rows(tables::LIKES).len(), 1);

        store.fail(Operation::Insert, AppError::Datastore("offline".into()));
        let err = store
            .insert(tables::LIKES, vec![json!({ "user_id": "u2", "resource_id": "r1" })])
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Datastore("offline".into()));

        store.clear_failure(Operation::Insert);
        store
            .insert(tables::LIKES, vec![json!({ "user_id": "u2", "resource_id": "r1" })])
            .await
            .unwrap();
        assert_eq!(store.count(Operation::Insert), 4);
    }
}
