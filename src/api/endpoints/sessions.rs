//! Session configuration, rich narrative generation, and playback.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::gateway::types::Tone;
use crate::pipeline::{self, PlaybackData, SessionUpdate};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRequest {
    #[serde(default)]
    pub image_descriptions: Vec<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub tone: Option<Tone>,
}

pub async fn generate_narrative(
    State(ctx): State<ApiContext>,
    Json(body): Json<NarrativeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let descriptions = if body.image_descriptions.is_empty() {
        vec!["A family gathering".to_string(), "Smiling faces".to_string()]
    } else {
        body.image_descriptions
    };

    let story = ctx
        .state
        .gateway
        .rich_narrative(
            &descriptions,
            body.context.as_deref().unwrap_or(""),
            body.tone.unwrap_or_default(),
        )
        .await;
    Ok(Json(serde_json::json!({ "story": story })))
}

pub async fn configure(
    State(ctx): State<ApiContext>,
    Json(update): Json<SessionUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if update.session_id.trim().is_empty() {
        return Err(ApiError::BadRequest("sessionId is required".into()));
    }
    let conn = ctx.state.open_db()?;
    let record = pipeline::configure_session(&conn, &update)?;
    Ok(Json(serde_json::json!({ "success": true, "session": record })))
}

pub async fn play(
    State(ctx): State<ApiContext>,
    Path(session_id): Path<String>,
) -> Result<Json<PlaybackData>, ApiError> {
    let mut conn = ctx.state.open_db()?;
    let data = pipeline::playback(&mut conn, &ctx.state.gateway, &session_id).await?;
    Ok(Json(data))
}
