//! Profile endpoints.

use axum::extract::{Path, State};

use super::{parse_id, success, ApiResult};
use crate::errors::AppError;
use crate::models::Profile;
use crate::AppState;

/// GET /api/profiles/:id - Get a single profile.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Profile> {
    let profile_id = parse_id(&id)?;

    match state.repo.get_profile(profile_id).await? {
        Some(profile) => success(profile),
        None => Err(AppError::NotFound(format!("Profile {} not found", id))),
    }
}
