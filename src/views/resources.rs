//! Learning resources listing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{ActionOutcome, Actor, ViewState};
use crate::db::Repository;
use crate::effects::{Navigator, Notifier, Toast};
use crate::errors::AppError;
use crate::models::{NewLike, ResourceListing, RESOURCE_CATEGORIES};

pub mod messages {
    pub const LOAD_FAILED: &str = "Failed to load resources";
    pub const LOGIN_TO_LIKE: &str = "Please log in to like resources";
    pub const LIKED: &str = "Resource liked!";
    pub const LIKE_FAILED: &str = "Failed to like resource";
    pub const LOGIN_TO_DOWNLOAD: &str = "Please log in to download resources";
    pub const DOWNLOAD_FAILED: &str = "Failed to download resource";
}

/// A resource as rendered in the listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCard {
    pub id: Uuid,
    pub title: String,
    /// `by {author} · {type}`
    pub byline: String,
    pub author: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub description: String,
    pub tags: Vec<String>,
    pub likes: u64,
    pub downloads: u64,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ResourceListing> for ResourceCard {
    fn from(listing: &ResourceListing) -> Self {
        let resource = &listing.record;
        let author = listing.owner_name().to_string();
        Self {
            id: resource.id,
            title: resource.title.clone(),
            byline: format!("by {} · {}", author, resource.kind),
            author,
            kind: resource.kind.clone(),
            category: resource.category.clone(),
            description: resource.description.clone(),
            tags: resource.tags.clone(),
            likes: resource.likes,
            downloads: resource.downloads,
            url: resource.url.clone(),
            created_at: resource.created_at,
        }
    }
}

/// Serializable state of the resources view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesSnapshot {
    pub state: ViewState,
    pub search_query: String,
    pub category: String,
    pub categories: Vec<String>,
    pub resources: Vec<ResourceCard>,
}

/// Controller for the resources page.
///
/// The search text and category are held as view state only; they do not narrow the
/// query.
pub struct ResourcesView {
    repo: Repository,
    actor: Option<Actor>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    state: ViewState,
    load_failed: bool,
    search_query: String,
    category: String,
    resources: Vec<ResourceListing>,
}

impl ResourcesView {
    pub fn new(
        repo: Repository,
        actor: Option<Actor>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            repo,
            actor,
            notifier,
            navigator,
            state: ViewState::Loading,
            load_failed: false,
            search_query: String::new(),
            category: RESOURCE_CATEGORIES[0].to_string(),
            resources: Vec::new(),
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
    pub fn resources(&self) -> &[ResourceListing] {
        &self.resources
    }

    /// Whether the most recent load was rejected by the datastore.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_category(&mut self, category: &str) -> Result<(), AppError> {
        if !RESOURCE_CATEGORIES.contains(&category) {
            return Err(AppError::Validation(format!(
                "Unknown category: {}",
                category
            )));
        }
        self.category = category.to_string();
        Ok(())
    }

    /// Perform the initial load. Later calls do nothing.
    pub async fn mount(&mut self) {
        if self.state == ViewState::Loaded {
            return;
        }
        self.load().await;
    }

    /// Re-read every resource from the datastore, replacing optimistic counters.
    pub async fn refresh(&mut self) {
        self.load().await;
    }

    async fn load(&mut self) {
        match self.repo.list_resources().await {
            Ok(resources) => {
                tracing::debug!("Loaded {} resources", resources.len());
                self.resources = resources;
                self.load_failed = false;
            }
            Err(e) => {
                tracing::error!("Error fetching resources: {}", e);
                self.load_failed = true;
                self.notifier.notify(Toast::error(messages::LOAD_FAILED));
            }
        }
        self.state = ViewState::Loaded;
    }

    /// Like a resource as the current actor.
    pub async fn like(&mut self, resource_id: Uuid) -> ActionOutcome {
        let Some(actor) = self.actor else {
            self.notifier.notify(Toast::error(messages::LOGIN_TO_LIKE));
            return ActionOutcome::Rejected;
        };

        let like = NewLike {
            user_id: actor.id,
            resource_id,
        };
        if let Err(e) = self.repo.insert_like(like).await {
            tracing::error!("Error liking resource {}: {}", resource_id, e);
            self.notifier.notify(Toast::error(messages::LIKE_FAILED));
            return ActionOutcome::Failed;
        }

        if let Some(listing) = self.find_mut(resource_id) {
            listing.record.likes = listing.record.likes.saturating_add(1);
        }
        self.notifier.notify(Toast::success(messages::LIKED));
        ActionOutcome::Completed
    }

    /// Count a download and open the resource's URL.
    ///
    /// The URL comes from the loaded list, so a resource that is not loaded cannot be
    /// downloaded.
    pub async fn download(&mut self, resource_id: Uuid) -> ActionOutcome {
        if self.actor.is_none() {
            self.notifier
                .notify(Toast::error(messages::LOGIN_TO_DOWNLOAD));
            return ActionOutcome::Rejected;
        }

        let Some(url) = self
            .resources
            .iter()
            .find(|listing| listing.record.id == resource_id)
            .map(|listing| listing.record.url.clone())
        else {
            tracing::warn!("Download requested for unknown resource {}", resource_id);
            self.notifier.notify(Toast::error(messages::DOWNLOAD_FAILED));
            return ActionOutcome::Failed;
        };

        if let Err(e) = self.repo.increment_downloads(resource_id).await {
            tracing::error!("Error downloading resource {}: {}", resource_id, e);
            self.notifier.notify(Toast::error(messages::DOWNLOAD_FAILED));
            return ActionOutcome::Failed;
        }

        if let Some(listing) = self.find_mut(resource_id) {
            listing.record.downloads = listing.record.downloads.saturating_add(1);
        }
        self.navigator.open_external(&url);
        ActionOutcome::Completed
    }

    pub fn cards(&self) -> Vec<ResourceCard> {
        self.resources.iter().map(ResourceCard::from).collect()
    }

    pub fn snapshot(&self) -> ResourcesSnapshot {
        ResourcesSnapshot {
            state: self.state,
            search_query: self.search_query.clone(),
            category: self.category.clone(),
            categories: RESOURCE_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            resources: self.cards(),
        }
    }

    fn find_mut(&mut self, resource_id: Uuid) -> Option<&mut ResourceListing> {
        self.resources
            .iter_mut()
            .find(|listing| listing.record.id == resource_id)
    }
}
