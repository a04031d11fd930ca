use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::entities::user;
use crate::error::AppError;
use crate::state::AppState;

/// Access tokens live for 15 minutes.
pub const ACCESS_TOKEN_TTL_SECS: usize = 900;

/// The caller behind a validated bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: user::Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == user::Role::Admin
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: i32,
    pub name: String,
    pub exp: usize,
    pub role: user::Role,
}

pub fn issue_access_token(user: &user::Model, secret: &str) -> Result<String, AppError> {
    let now = chrono::Utc::now().timestamp().max(0) as usize;
    let claims = Claims {
        sub: user.email.clone(),
        uid: user.id,
        name: user.name.clone(),
        exp: now + ACCESS_TOKEN_TTL_SECS,
        role: user.role.clone(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))
        .map_err(|e| AppError::InternalServerError(format!("token encode failed: {}", e)))
}

pub fn decode_access_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
        .map_err(|e| {
            tracing::debug!(error = %e, "jwt rejected");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;
    Ok(AuthUser {
        id: data.claims.uid,
        name: data.claims.name,
        email: data.claims.sub,
        role: data.claims.role,
    })
}

/// Validates the bearer token and stores the caller in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    let auth_user = decode_access_token(token, &state.config.jwt_secret)?;
    req.extensions_mut().insert(auth_user);

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthUser>().cloned())
    }
}
