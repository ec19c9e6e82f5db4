//! Signup and login.
//!
//! Both return a fresh bearer token; only its hash is stored. Login
//! rotates the token, invalidating the previous one.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{
    generate_salt, generate_token, hash_password, hash_token, verify_password, ApiContext,
};
use crate::db::repository::{patient, user};
use crate::models::User;

const ROLES: [&str; 3] = ["patient", "caregiver", "clinician"];

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn signup(
    State(ctx): State<ApiContext>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() {
        return Err(ApiError::BadRequest("Name and email are required".into()));
    }
    if body.password.len() < 6 {
        return Err(ApiError::BadRequest(
            "Password must be at least 6 characters".into(),
        ));
    }
    if !ROLES.contains(&body.role.as_str()) {
        return Err(ApiError::BadRequest(format!(
            "Role must be one of: {}",
            ROLES.join(", ")
        )));
    }

    let conn = ctx.state.open_db()?;
    if user::find_by_email(&conn, &body.email)?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".into()));
    }

    let salt = generate_salt();
    let token = generate_token();
    let account = User {
        id: uuid::Uuid::new_v4().to_string(),
        name: body.name.trim().to_string(),
        email: body.email.trim().to_lowercase(),
        role: body.role.clone(),
        password_hash: hash_password(&body.password, &salt),
        salt,
        token_hash: Some(hash_token(&token)),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    user::insert_user(&conn, &account)?;

    // Patients get their document tree rooted immediately.
    if account.role == "patient" {
        patient::ensure_patient(&conn, &account.id, &account.name)?;
    }

    tracing::info!(user_id = %account.id, role = %account.role, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "uid": account.id,
            "name": account.name,
            "email": account.email,
            "role": account.role,
            "token": token,
        })),
    ))
}

pub async fn login(
    State(ctx): State<ApiContext>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.state.open_db()?;
    let account = user::find_by_email(&conn, &body.email.trim().to_lowercase())?
        .ok_or(ApiError::Unauthorized)?;

    if !verify_password(&body.password, &account.salt, &account.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    let token = generate_token();
    user::set_token_hash(&conn, &account.id, &hash_token(&token))?;

    tracing::info!(user_id = %account.id, "User logged in");
    Ok(Json(serde_json::json!({
        "uid": account.id,
        "name": account.name,
        "email": account.email,
        "role": account.role,
        "token": token,
    })))
}
