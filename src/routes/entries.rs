use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::contest_entry::{self, EntryStatus};
use crate::error::{AppError, ErrorResponse};
use crate::middleware::auth::AuthUser;
use crate::models::submission::{EntryDetails, Submission, UploadedFile};
use crate::services::entries::OwnedPhoto;
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct EntryResponse {
    pub id: i32,
    pub contest_id: i32,
    #[schema(value_type = String)]
    pub photo_id: Uuid,
    pub status: EntryStatus,
    pub details: EntryDetails,
    pub release_mime_type: String,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<contest_entry::Model> for EntryResponse {
    fn from(e: contest_entry::Model) -> Self {
        EntryResponse {
            id: e.id,
            contest_id: e.contest_id,
            photo_id: e.photo_id,
            status: e.status,
            release_mime_type: e.release_mime_type,
            updated_at: e.updated_at,
            details: EntryDetails {
                subject_name: e.subject_name,
                subject_age: e.subject_age,
                subject_country: e.subject_country,
                subject_origin: e.subject_origin,
                location: e.location,
                subject_biography: e.subject_biography,
            },
        }
    }
}

/// Multipart form of a contest submission, for the API document only.
#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
pub struct SubmissionForm {
    /// Set to edit an existing active entry in place.
    entry_id: Option<i32>,
    signature: String,
    subject_name: String,
    subject_age: i32,
    subject_country: String,
    subject_origin: String,
    location: String,
    subject_biography: String,
    /// The photo itself; `image` is accepted as an alias.
    #[schema(value_type = String, format = Binary)]
    file: Option<Vec<u8>>,
    #[schema(value_type = String, format = Binary)]
    release: Option<Vec<u8>>,
}

fn bad_field(name: &str) -> AppError {
    AppError::BadRequest(format!("Invalid value for field '{}'", name))
}

async fn read_submission(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" | "image" | "release" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .map(|ct| ct.to_ascii_lowercase())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(|_| bad_field(&name))?;
                if data.is_empty() {
                    continue;
                }
                let upload = UploadedFile {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                };
                if name == "release" {
                    submission.release = Some(upload);
                } else {
                    submission.image = Some(upload);
                }
            }
            _ => {
                let text = field.text().await.map_err(|_| bad_field(&name))?;
                let d = &mut submission.details;
                match name.as_str() {
                    "entry_id" if !text.trim().is_empty() => {
                        submission.entry_id = Some(text.trim().parse().map_err(|_| bad_field(&name))?);
                    }
                    "signature" => submission.signature = text,
                    "subject_name" => d.subject_name = text,
                    "subject_age" => d.subject_age = text.trim().parse().map_err(|_| bad_field(&name))?,
                    "subject_country" => d.subject_country = text,
                    "subject_origin" => d.subject_origin = text,
                    "location" => d.location = text,
                    "subject_biography" => d.subject_biography = text,
                    _ => tracing::debug!(field = %name, "ignoring unknown form field"),
                }
            }
        }
    }

    Ok(submission)
}

#[utoipa::path(
    post,
    path = "/contests/{id}/entries",
    params(("id" = i32, Path, description = "Contest id")),
    request_body(content = SubmissionForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Entry submitted or edited", body = EntryResponse),
        (status = 400, description = "Invalid submission", body = ErrorResponse),
        (status = 404, description = "Contest or entry not found", body = ErrorResponse),
        (status = 409, description = "Entry limit reached", body = ErrorResponse),
        (status = 422, description = "Photo exceeds the maximum dimensions", body = ErrorResponse),
        (status = 500, description = "Could not upload photo", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Entries"
)]
pub async fn submit_entry(
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<EntryResponse>), AppError> {
    let submission = read_submission(multipart).await?;
    let entry = state.pipeline.submit(auth_user.id, contest_id, submission).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

#[utoipa::path(
    post,
    path = "/photos/{id}/withdraw",
    params(("id" = String, Path, description = "Photo id")),
    responses(
        (status = 200, description = "Entry withdrawn", body = EntryResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Entries"
)]
pub async fn withdraw_photo(
    State(state): State<AppState>,
    Path(photo_id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<EntryResponse>, AppError> {
    let entry = state.repo.withdraw(photo_id, auth_user.id).await?;
    Ok(Json(entry.into()))
}

#[utoipa::path(
    get,
    path = "/photos",
    responses(
        (status = 200, description = "The caller's photos", body = [OwnedPhoto])
    ),
    security(("bearer_auth" = [])),
    tag = "Entries"
)]
pub async fn my_photos(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<OwnedPhoto>>, AppError> {
    Ok(Json(state.repo.photos_with_entries(auth_user.id).await?))
}
