//! View-state controllers for the two listing pages.
//!
//! A view is mounted once, which performs its single load, then accepts user actions.
//! Writes patch the loaded list optimistically after the datastore accepts them and never
//! re-read the affected row, so counters shown here can lag behind concurrent writers
//! until the view is refreshed. Failures never escape a view: they are logged and surfaced
//! through the injected [`Notifier`](crate::effects::Notifier).

pub mod resources;
pub mod team_builder;

pub use resources::{ResourcesSnapshot, ResourcesView};
pub use team_builder::{TeamBuilderSnapshot, TeamBuilderView};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The signed-in user performing actions, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
}

/// Lifecycle of a mounted view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    Loading,
    Loaded,
}

/// Result of a user action on a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionOutcome {
    /// The action took effect (or, for stubs, reported success)
    Completed,
    /// No authenticated actor; nothing was sent to the datastore
    Rejected,
    /// The datastore refused the write, or the listing could not be loaded; local state
    /// is unchanged
    Failed,
    /// The action exists in the UI but has no implementation yet
    NotImplemented,
}
