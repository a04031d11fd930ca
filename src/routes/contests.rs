use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::entities::contest;
use crate::entities::contest_entry::EntryStatus;
use crate::error::{AppError, ErrorResponse};
use crate::middleware::auth::AuthUser;
use crate::services::entries::{GalleryItem, NewContest};
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateContestRequest {
    pub title: String,
    pub description: String,
    pub start_date: chrono::NaiveDateTime,
    pub end_date: chrono::NaiveDateTime,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestResponse {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub start_date: chrono::NaiveDateTime,
    pub end_date: chrono::NaiveDateTime,
}

impl From<contest::Model> for ContestResponse {
    fn from(c: contest::Model) -> Self {
        ContestResponse {
            id: c.id,
            slug: c.slug,
            title: c.title,
            description: c.description,
            start_date: c.start_date,
            end_date: c.end_date,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GalleryQuery {
    /// Only show entries with this status.
    pub status: Option<EntryStatus>,
}

#[utoipa::path(
    post,
    path = "/admin/contests",
    request_body = CreateContestRequest,
    responses(
        (status = 201, description = "Contest created", body = ContestResponse),
        (status = 400, description = "Invalid contest", body = ErrorResponse),
        (status = 403, description = "Administrator access required", body = ErrorResponse),
        (status = 409, description = "Slug already taken", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Administration"
)]
pub async fn create_contest(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateContestRequest>,
) -> Result<(StatusCode, Json<ContestResponse>), AppError> {
    let created = state
        .repo
        .create_contest(NewContest {
            title: payload.title,
            description: payload.description,
            start_date: payload.start_date,
            end_date: payload.end_date,
            updated_by: auth_user.name,
        })
        .await?;
    tracing::info!(contest_id = created.id, slug = %created.slug, "contest created");
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get,
    path = "/contests/{id}",
    params(("id" = String, Path, description = "Contest id or slug")),
    responses(
        (status = 200, description = "Contest details", body = ContestResponse),
        (status = 404, description = "Contest not found", body = ErrorResponse)
    ),
    tag = "Contests"
)]
pub async fn get_contest(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<Json<ContestResponse>, AppError> {
    let found = match id_or_slug.parse::<i32>() {
        Ok(id) => state.repo.contest_by_id(id).await?,
        Err(_) => state
            .repo
            .contest_by_slug(&id_or_slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?,
    };
    Ok(Json(found.into()))
}

#[utoipa::path(
    get,
    path = "/contests/{id}/gallery",
    params(("id" = i32, Path, description = "Contest id"), GalleryQuery),
    responses(
        (status = 200, description = "Visible entries of the contest", body = [GalleryItem]),
        (status = 404, description = "Contest not found", body = ErrorResponse)
    ),
    tag = "Contests"
)]
pub async fn gallery(
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<Vec<GalleryItem>>, AppError> {
    state.repo.contest_by_id(contest_id).await?;
    Ok(Json(state.repo.gallery(contest_id, query.status).await?))
}
