use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::entities::contest_entry::EntryStatus;
use crate::error::{AppError, ErrorResponse};
use crate::middleware::auth::AuthUser;
use crate::routes::entries::EntryResponse;
use crate::services::entries::{ScoredEntry, UpdateContestEntry};
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    pub status: EntryStatus,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct VoteRequest {
    /// 1 to 5.
    pub score: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VoteResponse {
    pub entry_id: i32,
    pub voter_id: i32,
    pub score: i32,
}

#[utoipa::path(
    get,
    path = "/admin/contests/{id}/entries",
    params(("id" = i32, Path, description = "Contest id")),
    responses(
        (status = 200, description = "Entries with owner, small rendition and summed score", body = [ScoredEntry]),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 404, description = "Contest not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Administration"
)]
pub async fn list_entries(
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
) -> Result<Json<Vec<ScoredEntry>>, AppError> {
    state.repo.contest_by_id(contest_id).await?;
    Ok(Json(state.repo.list_contest_photos_with_scores(contest_id).await?))
}

#[utoipa::path(
    patch,
    path = "/admin/entries/{id}/status",
    params(("id" = i32, Path, description = "Entry id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = EntryResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Administration"
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(entry_id): Path<i32>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<EntryResponse>, AppError> {
    let updated = state
        .repo
        .update_entry(UpdateContestEntry {
            entry_id,
            status: payload.status,
            updated_by: auth_user.name,
        })
        .await?;
    tracing::info!(entry_id, status = ?updated.status, admin_id = auth_user.id, "entry status changed");
    Ok(Json(updated.into()))
}

#[utoipa::path(
    put,
    path = "/admin/entries/{id}/vote",
    params(("id" = i32, Path, description = "Entry id")),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote recorded", body = VoteResponse),
        (status = 400, description = "Score out of range", body = ErrorResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Administration"
)]
pub async fn vote(
    State(state): State<AppState>,
    Path(entry_id): Path<i32>,
    auth_user: AuthUser,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    let saved = state.repo.cast_vote(entry_id, auth_user.id, payload.score).await?;
    Ok(Json(VoteResponse {
        entry_id: saved.entry_id,
        voter_id: saved.voter_id,
        score: saved.score,
    }))
}
