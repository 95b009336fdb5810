//! Data models for the campus hub.
//!
//! These mirror the columns of the hosted datastore's tables. Rows are owned by the
//! datastore; the backend only reads them and writes likes.

mod like;
mod profile;
mod resource;
mod team_request;

pub use like::*;
pub use profile::*;
pub use resource::*;
pub use team_request::*;

use serde::{Deserialize, Deserializer, Serialize};

/// Display subset of the owning profile, embedded in listing queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerProfile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A row joined with its owner's display profile.
///
/// The datastore nests the owner under the `profiles` key; a dangling or hidden owner
/// arrives as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithOwner<T> {
    #[serde(flatten)]
    pub record: T,
    #[serde(rename = "profiles", default)]
    pub owner: Option<OwnerProfile>,
}

impl<T> WithOwner<T> {
    /// Owner's display name, or an empty string when unknown.
    pub fn owner_name(&self) -> &str {
        self.owner
            .as_ref()
            .and_then(|o| o.full_name.as_deref())
            .unwrap_or("")
    }

    pub fn owner_avatar(&self) -> Option<&str> {
        self.owner.as_ref().and_then(|o| o.avatar_url.as_deref())
    }
}

/// Deserialize `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
