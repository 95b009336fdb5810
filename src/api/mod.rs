//! REST API module.
//!
//! Each page is served by mounting its view for the request, applying the requested
//! action, and returning the view snapshot together with the effects it produced.

mod profiles;
mod resources;
mod team_requests;

pub use profiles::*;
pub use resources::*;
pub use team_requests::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::effects::{RecordedEffects, Toast};
use crate::errors::AppError;
use crate::views::ActionOutcome;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// A view snapshot plus everything the user should see happen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse<V: Serialize> {
    pub view: V,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ActionOutcome>,
    pub notifications: Vec<Toast>,
    /// URL the client should open in a new browsing context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_url: Option<String>,
}

impl<V: Serialize> ViewResponse<V> {
    pub fn new(view: V, outcome: Option<ActionOutcome>, effects: &RecordedEffects) -> Self {
        Self {
            view,
            outcome,
            notifications: effects.toasts(),
            open_url: effects.opened().into_iter().next(),
        }
    }
}

/// Unwired listing controls, echoed back in the snapshot.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Flags accepted by action routes.
#[derive(Debug, Default, Deserialize)]
pub struct ActionParams {
    /// Re-read the listing after the action, replacing optimistic counters
    #[serde(default)]
    pub refresh: bool,
}

/// Parse a path id, rejecting anything that is not a UUID.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid id: {}", raw)))
}
