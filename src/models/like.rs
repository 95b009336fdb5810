//! Like payload for the `likes` table.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Insert payload recording that a user liked a resource.
///
/// No uniqueness is assumed here; whether a second like by the same user is rejected
/// depends on the datastore's constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLike {
    pub user_id: Uuid,
    pub resource_id: Uuid,
}
