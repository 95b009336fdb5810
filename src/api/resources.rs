//! Learning resource endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};

use super::{parse_id, success, ActionParams, ApiResult, ListingParams, ViewResponse};
use crate::auth::CurrentActor;
use crate::effects::RecordedEffects;
use crate::views::{ActionOutcome, Actor, ResourcesSnapshot, ResourcesView};
use crate::AppState;

type ResourcesResponse = ViewResponse<ResourcesSnapshot>;

async fn mounted_view(
    state: &AppState,
    actor: Option<Actor>,
    effects: &Arc<RecordedEffects>,
) -> ResourcesView {
    let mut view = ResourcesView::new(
        state.repo.clone(),
        actor,
        effects.clone(),
        effects.clone(),
    );
    view.mount().await;
    view
}

/// Actions are skipped when the listing did not load; the load error is the only
/// notification.
fn load_failed_response(
    view: &ResourcesView,
    effects: &RecordedEffects,
) -> ApiResult<ResourcesResponse> {
    success(ViewResponse::new(
        view.snapshot(),
        Some(ActionOutcome::Failed),
        effects,
    ))
}

/// GET /api/resources - Load the resources page.
pub async fn list_resources(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(params): Query<ListingParams>,
) -> ApiResult<ResourcesResponse> {
    let effects = Arc::new(RecordedEffects::new());
    let mut view = ResourcesView::new(
        state.repo.clone(),
        actor,
        effects.clone(),
        effects.clone(),
    );

    if let Some(q) = params.q {
        view.set_search_query(q);
    }
    if let Some(category) = params.category.as_deref() {
        view.set_category(category)?;
    }
    view.mount().await;

    success(ViewResponse::new(view.snapshot(), None, &effects))
}

/// POST /api/resources/:id/like - Like a resource.
pub async fn like_resource(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Query(params): Query<ActionParams>,
) -> ApiResult<ResourcesResponse> {
    let resource_id = parse_id(&id)?;
    let effects = Arc::new(RecordedEffects::new());
    let mut view = mounted_view(&state, actor, &effects).await;

    if view.load_failed() {
        return load_failed_response(&view, &effects);
    }

    let outcome = view.like(resource_id).await;
    if params.refresh {
        view.refresh().await;
    }

    success(ViewResponse::new(view.snapshot(), Some(outcome), &effects))
}

/// POST /api/resources/:id/download - Count a download and hand back the URL to open.
pub async fn download_resource(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Query(params): Query<ActionParams>,
) -> ApiResult<ResourcesResponse> {
    let resource_id = parse_id(&id)?;
    let effects = Arc::new(RecordedEffects::new());
    let mut view = mounted_view(&state, actor, &effects).await;

    if view.load_failed() {
        return load_failed_response(&view, &effects);
    }

    let outcome = view.download(resource_id).await;
    if params.refresh {
        view.refresh().await;
    }

    success(ViewResponse::new(view.snapshot(), Some(outcome), &effects))
}
