//! Typed queries over the datastore contract.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{tables, Datastore, Embed, SelectQuery};
use crate::errors::AppError;
use crate::models::{NewLike, Profile, ResourceListing, TeamRequestListing};

/// Repository for all data operations the views need.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn Datastore>,
}

impl Repository {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    // ==================== LISTINGS ====================

    /// All resources with their owner's display profile, newest first.
    pub async fn list_resources(&self) -> Result<Vec<ResourceListing>, AppError> {
        let rows = self.store.select(&listing_query(tables::RESOURCES)).await?;
        decode_rows(rows)
    }

    /// All team requests with their owner's display profile, newest first.
    pub async fn list_team_requests(&self) -> Result<Vec<TeamRequestListing>, AppError> {
        let rows = self
            .store
            .select(&listing_query(tables::TEAM_REQUESTS))
            .await?;
        decode_rows(rows)
    }

    /// Get a profile by ID.
    pub async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        let rows = self.store.select(&profile_query(id)).await?;
        Ok(decode_rows(rows)?.into_iter().next())
    }

    // ==================== WRITES ====================

    /// Record a like. Duplicate handling is left to the datastore's constraints.
    pub async fn insert_like(&self, like: NewLike) -> Result<(), AppError> {
        let row = serde_json::to_value(like)?;
        self.store.insert(tables::LIKES, vec![row]).await
    }

    /// Ask the datastore to atomically bump a resource's download counter.
    pub async fn increment_downloads(&self, resource_id: Uuid) -> Result<(), AppError> {
        self.store
            .rpc(
                tables::INCREMENT_DOWNLOADS,
                json!({ "resource_id": resource_id }),
            )
            .await?;
        Ok(())
    }
}

/// Columns returned for a profile lookup.
const PROFILE_COLUMNS: [&str; 8] = [
    "id",
    "email",
    "full_name",
    "avatar_url",
    "role",
    "skills",
    "bio",
    "created_at",
];

fn profile_query(id: Uuid) -> SelectQuery {
    PROFILE_COLUMNS
        .iter()
        .fold(SelectQuery::from(tables::PROFILES), |query, column| {
            query.column(column)
        })
        .eq("id", id)
        .limit(1)
}

fn listing_query(table: &str) -> SelectQuery {
    SelectQuery::from(table)
        .all_columns()
        .embed(Embed::owner_profile())
        .order("created_at", false)
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, AppError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(AppError::from))
        .collect()
}
