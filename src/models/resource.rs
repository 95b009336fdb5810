//! Resource model for the `resources` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{null_as_default, WithOwner};

/// Categories offered by the listing's category selector.
pub const RESOURCE_CATEGORIES: [&str; 4] = [
    "All Categories",
    "Web Development",
    "Machine Learning",
    "Interview Prep",
];

/// A shared learning resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub url: String,
    pub user_id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub downloads: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Resource row as returned by the listing query.
pub type ResourceListing = WithOwner<Resource>;
