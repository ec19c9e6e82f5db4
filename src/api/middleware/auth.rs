//! Bearer token authentication middleware.

use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;

use crate::api::error::ApiError;
use crate::api::types::{hash_token, ApiContext, UserContext};
use crate::db::repository::user;

/// Validate the `Authorization: Bearer` header against the stored token
/// hash and inject the matching `UserContext` for handlers.
pub async fn require_auth(
    Extension(ctx): Extension<ApiContext>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let conn = ctx.state.open_db()?;
    let account = user::find_by_token_hash(&conn, &hash_token(token))?
        .ok_or(ApiError::Unauthorized)?;

    request.extensions_mut().insert(UserContext {
        id: account.id,
        email: account.email,
        role: account.role,
    });
    Ok(next.run(request).await)
}
