//! Memoryscape: photo uploads, collection analysis, and narrative
//! generation for memory therapy sessions.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::gateway::types::{CollectionAnalysis, MediaPart};

const MAX_UPLOAD_FILES: usize = 10;

pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = ctx.state.media()?;
    let mut urls = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if urls.len() >= MAX_UPLOAD_FILES {
            return Err(ApiError::BadRequest(format!(
                "At most {MAX_UPLOAD_FILES} files per upload"
            )));
        }
        let name = field.file_name().unwrap_or("photo.jpg").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        urls.push(store.save(&name, &data)?);
    }

    if urls.is_empty() {
        return Err(ApiError::BadRequest("No files uploaded".into()));
    }
    Ok(Json(serde_json::json!({ "imageUrls": urls })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub image_urls: Option<Vec<String>>,
}

pub async fn analyze(
    State(ctx): State<ApiContext>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let urls = body
        .image_urls
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("imageUrls is required".into()))?;

    let store = ctx.state.media()?;
    let mut media = Vec::with_capacity(urls.len());
    for url in &urls {
        let (data, mime) = store
            .open(url)
            .map_err(|_| ApiError::BadRequest(format!("Unknown image: {url}")))?;
        media.push(MediaPart { mime, data });
    }

    let analysis = ctx.state.gateway.analyze_collection(media).await;
    Ok(Json(serde_json::to_value(analysis)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSessionRequest {
    pub analysis_result: Option<CollectionAnalysis>,
    #[serde(default)]
    pub descriptions: Vec<String>,
}

pub async fn generate_session(
    State(ctx): State<ApiContext>,
    Json(body): Json<GenerateSessionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let analysis = body
        .analysis_result
        .ok_or_else(|| ApiError::BadRequest("analysisResult is required".into()))?;

    let story = ctx
        .state
        .gateway
        .session_narrative(&analysis, &body.descriptions)
        .await;
    Ok(Json(serde_json::json!({ "story": story })))
}
