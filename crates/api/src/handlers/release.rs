//! Handlers for the `/releases` resource.

use axum::extract::State;
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::Json;
use releasetracker_core::query::Page;
use releasetracker_core::release::{Release, ReleaseRequest};
use releasetracker_core::release_status::ReleaseStatus;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery, ReleaseIdPath};
use crate::query::ListReleasesParams;
use crate::response::StatusEntry;
use crate::state::AppState;

/// POST /api/releases
pub async fn create(
    State(state): State<AppState>,
    AppJson(body): AppJson<ReleaseRequest>,
) -> AppResult<(StatusCode, [(axum::http::HeaderName, String); 1], Json<Release>)> {
    let input = body.into_input()?;
    let release = state.directory.create(input).await?;
    let location = format!("/api/releases/{}", release.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(release)))
}

/// GET /api/releases
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListReleasesParams>,
) -> AppResult<Json<Page<Release>>> {
    let filter = params.filter()?;
    let request = params.page_request()?;
    let page = state.directory.list(&filter, &request).await?;
    Ok(Json(page))
}

/// GET /api/releases/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ReleaseIdPath(id): ReleaseIdPath,
) -> AppResult<Json<Release>> {
    let release = state.directory.get_by_id(id).await?;
    Ok(Json(release))
}

/// PUT /api/releases/{id}
pub async fn update(
    State(state): State<AppState>,
    ReleaseIdPath(id): ReleaseIdPath,
    AppJson(body): AppJson<ReleaseRequest>,
) -> AppResult<Json<Release>> {
    let input = body.into_input()?;
    let release = state.directory.update(id, input).await?;
    Ok(Json(release))
}

/// DELETE /api/releases/{id}
pub async fn delete(
    State(state): State<AppState>,
    ReleaseIdPath(id): ReleaseIdPath,
) -> AppResult<StatusCode> {
    state.directory.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/releases/statuses
pub async fn list_statuses() -> Json<Vec<StatusEntry>> {
    Json(ReleaseStatus::ALL.iter().copied().map(StatusEntry::from).collect())
}
