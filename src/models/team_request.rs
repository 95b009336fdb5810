//! Team request model for the `team_requests` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{null_as_default, WithOwner};

/// A request for teammates for a hackathon or event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRequest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub event: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills_needed: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spots_available: u32,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Team request row as returned by the listing query.
pub type TeamRequestListing = WithOwner<TeamRequest>;
