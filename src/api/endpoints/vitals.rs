//! Vitals reads and appends.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::{patient, vitals};
use crate::models::VitalsEntry;

/// Baseline values served when a patient has no vitals history yet.
fn default_vitals() -> VitalsEntry {
    VitalsEntry {
        hrv: 45.0,
        sleep_score: 70.0,
        activity_score: 500.0,
        medication_adherence: 100.0,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

pub async fn latest(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<VitalsEntry>, ApiError> {
    let conn = ctx.state.open_db()?;
    let entry = vitals::latest_vitals(&conn, &patient_id)?.unwrap_or_else(default_vitals);
    Ok(Json(entry))
}

/// Wearable push payload. All fields must be present; a partial snapshot
/// is rejected rather than zero-filled.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsPush {
    pub hrv: Option<f64>,
    pub sleep_score: Option<f64>,
    pub activity_score: Option<f64>,
    pub medication_adherence: Option<f64>,
}

pub async fn push(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    Json(body): Json<VitalsPush>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(hrv), Some(sleep_score), Some(activity_score), Some(medication_adherence)) = (
        body.hrv,
        body.sleep_score,
        body.activity_score,
        body.medication_adherence,
    ) else {
        return Err(ApiError::BadRequest(
            "hrv, sleepScore, activityScore and medicationAdherence are required".into(),
        ));
    };

    let entry = VitalsEntry {
        hrv,
        sleep_score,
        activity_score,
        medication_adherence,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    let conn = ctx.state.open_db()?;
    patient::ensure_patient(&conn, &patient_id, &patient_id)?;
    vitals::insert_vitals(&conn, &patient_id, &entry)?;
    patient::update_summary(&conn, &patient_id, &serde_json::to_value(&entry)?)?;

    Ok(Json(serde_json::json!({ "success": true, "data": entry })))
}
