//! Hackathon team request listing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{ActionOutcome, Actor, ViewState};
use crate::db::Repository;
use crate::effects::{Notifier, Toast};
use crate::models::TeamRequestListing;

pub mod messages {
    pub const LOAD_FAILED: &str = "Failed to load team requests";
    pub const LOGIN_TO_CREATE: &str = "Please log in to create a team request";
    pub const LOGIN_TO_APPLY: &str = "Please log in to apply";
    pub const APPLIED: &str = "Application submitted successfully";
}

/// Shown when the owner has no avatar.
pub const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/40";

/// `1 spot left`, `3 spots left`.
pub fn spots_label(spots: u32) -> String {
    if spots == 1 {
        format!("{} spot left", spots)
    } else {
        format!("{} spots left", spots)
    }
}

/// Which team builder actions have a real implementation behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBuilderCapabilities {
    /// Creating a request is not wired to a form yet
    pub create_request: bool,
    /// Applying reports success but stores nothing
    pub apply_persisted: bool,
}

pub const CAPABILITIES: TeamBuilderCapabilities = TeamBuilderCapabilities {
    create_request: false,
    apply_persisted: false,
};

/// A team request as rendered in the listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRequestCard {
    pub id: Uuid,
    pub title: String,
    pub posted_by: String,
    pub avatar_url: String,
    pub event: String,
    pub description: String,
    pub skills_needed: Vec<String>,
    pub spots_available: u32,
    pub spots_label: String,
    pub created_at: DateTime<Utc>,
}

impl From<&TeamRequestListing> for TeamRequestCard {
    fn from(listing: &TeamRequestListing) -> Self {
        let request = &listing.record;
        Self {
            id: request.id,
            title: request.title.clone(),
            posted_by: format!("Posted by {}", listing.owner_name()),
            avatar_url: listing
                .owner_avatar()
                .filter(|url| !url.is_empty())
                .unwrap_or(PLACEHOLDER_AVATAR)
                .to_string(),
            event: request.event.clone(),
            description: request.description.clone(),
            skills_needed: request.skills_needed.clone(),
            spots_available: request.spots_available,
            spots_label: spots_label(request.spots_available),
            created_at: request.created_at,
        }
    }
}

/// Serializable state of the team builder view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBuilderSnapshot {
    pub state: ViewState,
    pub search_query: String,
    pub capabilities: TeamBuilderCapabilities,
    pub team_requests: Vec<TeamRequestCard>,
}

/// Controller for the team builder page.
pub struct TeamBuilderView {
    repo: Repository,
    actor: Option<Actor>,
    notifier: Arc<dyn Notifier>,
    state: ViewState,
    load_failed: bool,
    search_query: String,
    team_requests: Vec<TeamRequestListing>,
}

impl TeamBuilderView {
    pub fn new(repo: Repository, actor: Option<Actor>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repo,
            actor,
            notifier,
            state: ViewState::Loading,
            load_failed: false,
            search_query: String::new(),
            team_requests: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> ViewState {
        self.state
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.state == ViewState::Loading
    }

    #[cfg(test)]
    pub fn team_requests(&self) -> &[TeamRequestListing] {
        &self.team_requests
    }

    /// Whether the most recent load was rejected by the datastore.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Perform the initial load. Later calls do nothing.
    pub async fn mount(&mut self) {
        if self.state == ViewState::Loaded {
            return;
        }
        self.load().await;
    }

    pub async fn refresh(&mut self) {
        self.load().await;
    }

    async fn load(&mut self) {
        match self.repo.list_team_requests().await {
            Ok(requests) => {
                tracing::debug!("Loaded {} team requests", requests.len());
                self.team_requests = requests;
                self.load_failed = false;
            }
            Err(e) => {
                tracing::error!("Error fetching team requests: {}", e);
                self.load_failed = true;
                self.notifier.notify(Toast::error(messages::LOAD_FAILED));
            }
        }
        self.state = ViewState::Loaded;
    }

    /// Start a new team request. There is no creation flow yet.
    pub async fn create_request(&mut self) -> ActionOutcome {
        if self.actor.is_none() {
            self.notifier.notify(Toast::error(messages::LOGIN_TO_CREATE));
            return ActionOutcome::Rejected;
        }
        ActionOutcome::NotImplemented
    }

    /// Apply to join a team. Reports success without storing anything.
    pub async fn apply(&mut self, request_id: Uuid) -> ActionOutcome {
        if self.actor.is_none() {
            self.notifier.notify(Toast::error(messages::LOGIN_TO_APPLY));
            return ActionOutcome::Rejected;
        }
        tracing::info!("Application to team request {} acknowledged", request_id);
        self.notifier.notify(Toast::success(messages::APPLIED));
        ActionOutcome::Completed
    }

    pub fn cards(&self) -> Vec<TeamRequestCard> {
        self.team_requests.iter().map(TeamRequestCard::from).collect()
    }

    pub fn snapshot(&self) -> TeamBuilderSnapshot {
        TeamBuilderSnapshot {
            state: self.state,
            search_query: self.search_query.clone(),
            capabilities: CAPABILITIES,
            team_requests: self.cards(),
        }
    }
}
