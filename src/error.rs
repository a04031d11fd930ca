use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::services::repository::StoreError;
use crate::services::submission::SubmitError;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    DatabaseError(sea_orm::DbErr),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unprocessable: {0}")]
    UnprocessableEntity(String),
    #[error("internal error: {0}")]
    InternalServerError(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::DatabaseError(e) => {
                tracing::error!(error = %e, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::UploadFailed(detail) => {
                tracing::error!(error = %detail, "photo upload failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Could not upload photo".to_string())
            }
        };

        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseError(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("Not found".to_string()),
            StoreError::InvalidSize(size) => AppError::BadRequest(format!("Invalid photo size: {}", size)),
            StoreError::Validation(msg) => AppError::BadRequest(msg),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Database(e) => AppError::DatabaseError(e),
            StoreError::WrongPassword => AppError::Unauthorized("Current password is incorrect".to_string()),
            StoreError::PasswordHash(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(msg) => AppError::BadRequest(msg),
            SubmitError::NotFound => AppError::NotFound("Not found".to_string()),
            e @ SubmitError::LimitReached(_) => AppError::Conflict(e.to_string()),
            e @ SubmitError::Oversize { .. } => AppError::UnprocessableEntity(e.to_string()),
            e => AppError::UploadFailed(e.to_string()),
        }
    }
}
