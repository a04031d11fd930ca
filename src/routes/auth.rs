use axum::{extract::State, http::StatusCode, response::Json};
use base64::{engine::general_purpose, Engine as _};
use rand::Rng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entities::{refresh_token, user};
use crate::error::{AppError, ErrorResponse};
use crate::middleware::auth::{issue_access_token, AuthUser, ACCESS_TOKEN_TTL_SECS};
use crate::services::users::{NewUser, UpdateUser};
use crate::state::AppState;
use crate::utils::demographics;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub street: String,
    pub city: String,
    /// Two-letter state code, or "OO" outside the US.
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub age: i32,
    pub gender: String,
    pub ethnicity: String,
    pub other_ethnicity: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: usize,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub age: i32,
    pub gender: String,
    pub ethnicity: String,
    pub other_ethnicity: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PasswordChangedResponse {
    pub message: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserProfile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: user::Role,
    pub city: String,
    pub state: String,
    pub state_name: Option<String>,
    pub age: i32,
    pub created_at: chrono::NaiveDateTime,
}

impl From<user::Model> for UserProfile {
    fn from(u: user::Model) -> Self {
        UserProfile {
            state_name: demographics::state_name(&u.state).map(str::to_string),
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            city: u.city,
            state: u.state,
            age: u.age,
            created_at: u.created_at,
        }
    }
}

fn generate_refresh_token() -> String {
    let mut random_bytes = [0u8; 32];
    rand::thread_rng().fill(&mut random_bytes);
    general_purpose::STANDARD.encode(random_bytes)
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Invalid registration", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let created = state
        .repo
        .create_user(NewUser {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            password_confirm: payload.password_confirm,
            street: payload.street,
            city: payload.city,
            state: payload.state,
            zip: payload.zip,
            phone: payload.phone,
            age: payload.age,
            gender: payload.gender,
            ethnicity: payload.ethnicity,
            other_ethnicity: payload.other_ethnicity,
            role: user::Role::User,
        })
        .await?;
    tracing::info!(user_id = created.id, "user registered");
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let Some(user) = state.repo.authenticate(&payload.email, &payload.password).await? else {
        tracing::info!("login rejected");
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    };

    let access_token = issue_access_token(&user, &state.config.jwt_secret)?;

    let refresh_token_str = generate_refresh_token();
    let now = chrono::Utc::now().naive_utc();
    refresh_token::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        token_hash: Set(hash_token(&refresh_token_str)),
        expires_at: Set(now + chrono::Duration::days(1)),
        created_at: Set(now),
        revoked: Set(false),
    }
    .insert(state.repo.connection())
    .await?;

    tracing::info!(user_id = user.id, "login succeeded");
    Ok(Json(LoginResponse {
        access_token,
        refresh_token: refresh_token_str,
        expires_in: ACCESS_TOKEN_TTL_SECS,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed successfully", body = RefreshResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let token = refresh_token::Entity::find()
        .filter(refresh_token::Column::TokenHash.eq(hash_token(&payload.refresh_token)))
        .one(state.repo.connection())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token. Please re-login.".to_string()))?;

    if token.revoked {
        return Err(AppError::Unauthorized("User logged out. Please re-login.".to_string()));
    }
    if token.expires_at < chrono::Utc::now().naive_utc() {
        return Err(AppError::Unauthorized("Refresh token expired. Please re-login.".to_string()));
    }

    let user = state
        .repo
        .user_by_id(token.user_id)
        .await
        .map_err(|_| AppError::Unauthorized("User not found. Please re-login.".to_string()))?;

    let access_token = issue_access_token(&user, &state.config.jwt_secret)?;
    tracing::debug!(user_id = user.id, "access token refreshed");
    Ok(Json(RefreshResponse { access_token }))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Logged out successfully", body = LogoutResponse),
        (status = 404, description = "Refresh token not found", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> Result<Json<LogoutResponse>, AppError> {
    let token = refresh_token::Entity::find()
        .filter(refresh_token::Column::TokenHash.eq(hash_token(&payload.refresh_token)))
        .one(state.repo.connection())
        .await?
        .ok_or_else(|| AppError::NotFound("Refresh token not found".to_string()))?;

    let mut active: refresh_token::ActiveModel = token.into();
    active.revoked = Set(true);
    active.update(state.repo.connection()).await?;

    Ok(Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "User profile retrieved successfully", body = UserProfile),
        (status = 401, description = "Invalid or missing token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(State(state): State<AppState>, auth_user: AuthUser) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .repo
        .user_by_id(auth_user.id)
        .await
        .map_err(|_| AppError::Unauthorized("User no longer exists".to_string()))?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    patch,
    path = "/auth/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Invalid profile", body = ErrorResponse),
        (status = 401, description = "Invalid or missing token", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let updated = state
        .repo
        .update_user(
            auth_user.id,
            UpdateUser {
                name: payload.name,
                email: payload.email,
                street: payload.street,
                city: payload.city,
                state: payload.state,
                zip: payload.zip,
                phone: payload.phone,
                age: payload.age,
                gender: payload.gender,
                ethnicity: payload.ethnicity,
                other_ethnicity: payload.other_ethnicity,
            },
        )
        .await?;
    tracing::info!(user_id = updated.id, "profile updated");
    Ok(Json(updated.into()))
}

#[utoipa::path(
    put,
    path = "/auth/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = PasswordChangedResponse),
        (status = 400, description = "New password rejected", body = ErrorResponse),
        (status = 401, description = "Current password is incorrect", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<PasswordChangedResponse>, AppError> {
    state
        .repo
        .update_password(
            auth_user.id,
            &payload.current_password,
            &payload.password,
            &payload.password_confirm,
        )
        .await?;
    tracing::info!(user_id = auth_user.id, "password changed");
    Ok(Json(PasswordChangedResponse {
        message: "Password changed".to_string(),
    }))
}
