//! Cognitive assessments: speech fluency, clock drawing, word recall.
//!
//! Results attach to the patient named in the request (`patientId` body or
//! form field), defaulting to the authenticated user.

use axum::extract::{Multipart, Path, State};
use axum::{Extension, Json};
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::repository::{assessment, patient};
use crate::gateway::types::MediaPart;
use crate::models::AssessmentRecord;

/// Fixed word lists for the recall test. One is picked at random per
/// round so the patient cannot memorize a single list across sessions.
const RECALL_SETS: [[&str; 5]; 3] = [
    ["Apple", "Table", "Penny", "River", "Candle"],
    ["Garden", "Mirror", "Button", "Cloud", "Spoon"],
    ["Window", "Orange", "Ladder", "Basket", "Stone"],
];

/// Pull the named file field plus an optional `patientId` text field out
/// of a multipart body.
async fn read_upload(
    multipart: &mut Multipart,
    field_name: &str,
) -> Result<(Option<MediaPart>, Option<String>), ApiError> {
    let mut media = None;
    let mut patient_id = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some(name) if name == field_name => {
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                media = Some(MediaPart {
                    mime,
                    data: data.to_vec(),
                });
            }
            Some("patientId") => {
                patient_id = field.text().await.ok().filter(|t| !t.is_empty());
            }
            _ => {}
        }
    }
    Ok((media, patient_id))
}

fn store_result(
    ctx: &ApiContext,
    patient_id: &str,
    kind: &str,
    score: f64,
    details: serde_json::Value,
) -> Result<(), ApiError> {
    let conn = ctx.state.open_db()?;
    patient::ensure_patient(&conn, patient_id, patient_id)?;
    assessment::insert_assessment(
        &conn,
        patient_id,
        &AssessmentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            kind: kind.to_string(),
            score,
            details,
            timestamp: chrono::Utc::now().to_rfc3339(),
        },
    )?;
    Ok(())
}

pub async fn speech(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (media, patient_id) = read_upload(&mut multipart, "audio").await?;
    let audio = media.ok_or_else(|| ApiError::BadRequest("Missing 'audio' file upload".into()))?;
    let patient_id = patient_id.unwrap_or(user.id);

    let analysis = ctx.state.gateway.analyze_speech(audio).await;
    let details = serde_json::to_value(&analysis)?;
    store_result(&ctx, &patient_id, "Speech", analysis.fluency_score, details.clone())?;
    Ok(Json(details))
}

pub async fn drawing(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (media, patient_id) = read_upload(&mut multipart, "image").await?;
    let image = media.ok_or_else(|| ApiError::BadRequest("Missing 'image' file upload".into()))?;
    let patient_id = patient_id.unwrap_or(user.id);

    let analysis = ctx.state.gateway.analyze_drawing(image).await;
    let details = serde_json::to_value(&analysis)?;
    store_result(&ctx, &patient_id, "Drawing", analysis.total_score, details.clone())?;
    Ok(Json(details))
}

pub async fn recall_generate() -> Json<serde_json::Value> {
    let set = RECALL_SETS
        .choose(&mut rand::thread_rng())
        .unwrap_or(&RECALL_SETS[0]);
    Json(serde_json::json!({
        "items": set,
        "instructions": "Read these five words aloud, then repeat back as many \
                         as you can remember after a short pause.",
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallSubmission {
    pub target_items: Option<Vec<String>>,
    pub user_response: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub response_time_seconds: Option<f64>,
}

pub async fn recall_evaluate(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<RecallSubmission>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(targets), Some(response)) = (body.target_items, body.user_response) else {
        return Err(ApiError::BadRequest(
            "targetItems and userResponse are required".into(),
        ));
    };
    if targets.is_empty() {
        return Err(ApiError::BadRequest("targetItems must not be empty".into()));
    }
    let patient_id = body.patient_id.unwrap_or(user.id);

    let evaluation = ctx.state.gateway.evaluate_recall(&targets, &response).await;

    let mut details = serde_json::to_value(&evaluation)?;
    if let Some(object) = details.as_object_mut() {
        if let Some(rt) = body.response_time_seconds {
            object.insert("responseTimeSeconds".into(), rt.into());
        }
        object.insert(
            "timestamp".into(),
            chrono::Utc::now().to_rfc3339().into(),
        );
    }

    store_result(
        &ctx,
        &patient_id,
        "Recall",
        evaluation.accuracy as f64,
        details.clone(),
    )?;
    Ok(Json(details))
}

pub async fn history(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<AssessmentRecord>>, ApiError> {
    let conn = ctx.state.open_db()?;
    Ok(Json(assessment::recent_assessments(&conn, &patient_id, 50)?))
}
