use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

/// Must run after `auth_middleware`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let auth_user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    if !auth_user.is_admin() {
        tracing::warn!(user_id = auth_user.id, "admin route denied");
        return Err(AppError::Forbidden("Administrator access required".to_string()));
    }

    Ok(next.run(req).await)
}
