//! Team builder endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};

use super::{parse_id, success, ActionParams, ApiResult, ListingParams, ViewResponse};
use crate::auth::CurrentActor;
use crate::effects::RecordedEffects;
use crate::views::{ActionOutcome, Actor, TeamBuilderSnapshot, TeamBuilderView};
use crate::AppState;

type TeamBuilderResponse = ViewResponse<TeamBuilderSnapshot>;

async fn mounted_view(
    state: &AppState,
    actor: Option<Actor>,
    effects: &Arc<RecordedEffects>,
    params: ListingParams,
) -> TeamBuilderView {
    let mut view = TeamBuilderView::new(state.repo.clone(), actor, effects.clone());
    if let Some(q) = params.q {
        view.set_search_query(q);
    }
    view.mount().await;
    view
}

/// Actions are skipped when the listing did not load; the load error is the only
/// notification.
fn load_failed_response(
    view: &TeamBuilderView,
    effects: &RecordedEffects,
) -> ApiResult<TeamBuilderResponse> {
    success(ViewResponse::new(
        view.snapshot(),
        Some(ActionOutcome::Failed),
        effects,
    ))
}

/// GET /api/team-requests - Load the team builder page.
pub async fn list_team_requests(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(params): Query<ListingParams>,
) -> ApiResult<TeamBuilderResponse> {
    let effects = Arc::new(RecordedEffects::new());
    let view = mounted_view(&state, actor, &effects, params).await;

    success(ViewResponse::new(view.snapshot(), None, &effects))
}

/// POST /api/team-requests - Create a team request (no creation flow yet).
pub async fn create_team_request(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(params): Query<ActionParams>,
) -> ApiResult<TeamBuilderResponse> {
    let effects = Arc::new(RecordedEffects::new());
    let mut view = mounted_view(&state, actor, &effects, ListingParams::default()).await;
    if view.load_failed() {
        return load_failed_response(&view, &effects);
    }

    let outcome = view.create_request().await;
    if params.refresh {
        view.refresh().await;
    }

    success(ViewResponse::new(view.snapshot(), Some(outcome), &effects))
}

/// POST /api/team-requests/:id/apply - Apply to join a team.
pub async fn apply_to_team(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Query(params): Query<ActionParams>,
) -> ApiResult<TeamBuilderResponse> {
    let request_id = parse_id(&id)?;
    let effects = Arc::new(RecordedEffects::new());
    let mut view = mounted_view(&state, actor, &effects, ListingParams::default()).await;
    if view.load_failed() {
        return load_failed_response(&view, &effects);
    }

    let outcome = view.apply(request_id).await;
    if params.refresh {
        view.refresh().await;
    }

    success(ViewResponse::new(view.snapshot(), Some(outcome), &effects))
}
