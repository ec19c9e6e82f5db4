//! Clinician surface: narrative reports, analytics comparison, and data
//! exports (CSV and PDF).

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::{agitation, assessment, vitals};
use crate::models::{AgitationLog, AssessmentRecord, VitalsEntry};
use crate::report;

pub async fn clinical_report(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.state.open_db()?;
    let assessments = assessment::recent_assessments(&conn, &patient_id, 50)?;
    let logs = agitation::recent_logs(&conn, &patient_id, 100)?;
    let last_vitals = vitals::latest_vitals(&conn, &patient_id)?;

    let bundle = serde_json::json!({
        "assessments": &assessments,
        "agitationLogs": &logs,
        "latestVitals": &last_vitals,
    });
    let summary = ctx
        .state
        .gateway
        .clinical_insights(&bundle, "last 30 days")
        .await;

    Ok(Json(serde_json::json!({
        "summary": summary,
        "stats": {
            "totalAssessments": assessments.len(),
            "agitationCount": logs.len(),
            "lastVitals": last_vitals,
        },
    })))
}

pub async fn export_csv(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Response, ApiError> {
    let conn = ctx.state.open_db()?;
    let history = vitals::recent_vitals(&conn, &patient_id, 1000)?;

    let mut csv = String::from("timestamp,hrv,sleepScore,activityScore,medicationAdherence\n");
    for entry in &history {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            entry.timestamp,
            entry.hrv,
            entry.sleep_score,
            entry.activity_score,
            entry.medication_adherence,
        ));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"vitals_{patient_id}.csv\""),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Exported unauthenticated so the link can be opened straight from a
/// browser tab without the dashboard's bearer token.
pub async fn export_pdf(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Response, ApiError> {
    let conn = ctx.state.open_db()?;
    let assessments = assessment::recent_assessments(&conn, &patient_id, 20)?;
    let logs = agitation::recent_logs(&conn, &patient_id, 20)?;
    let last_vitals = vitals::latest_vitals(&conn, &patient_id)?;

    let pdf = report::patient_report(&patient_id, &assessments, &logs, last_vitals.as_ref())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"neuroscan_report_{patient_id}.pdf\""),
            ),
        ],
        pdf,
    )
        .into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PeriodAggregates {
    avg_score: f64,
    agitation_episodes: usize,
    avg_hrv: f64,
}

fn aggregate(
    assessments: &[AssessmentRecord],
    logs: &[AgitationLog],
    vitals: &[VitalsEntry],
) -> PeriodAggregates {
    let avg = |values: Vec<f64>| {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    };
    PeriodAggregates {
        avg_score: avg(assessments.iter().map(|a| a.score).collect()),
        agitation_episodes: logs.len(),
        avg_hrv: avg(vitals.iter().map(|v| v.hrv).collect()),
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub patient_id: Option<String>,
}

/// Split the stored history into halves (recent vs prior) and ask the
/// gateway to characterize the trajectory between them.
pub async fn compare_periods(
    State(ctx): State<ApiContext>,
    Json(body): Json<CompareRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let patient_id = body
        .patient_id
        .ok_or_else(|| ApiError::BadRequest("patientId is required".into()))?;
    let conn = ctx.state.open_db()?;
    let assessments = assessment::recent_assessments(&conn, &patient_id, 100)?;
    let logs = agitation::recent_logs(&conn, &patient_id, 200)?;
    let history = vitals::recent_vitals(&conn, &patient_id, 200)?;

    // Rows come newest-first; the first half is the current period.
    let (recent_a, prior_a) = assessments.split_at(assessments.len() / 2);
    let (recent_l, prior_l) = logs.split_at(logs.len() / 2);
    let (recent_v, prior_v) = history.split_at(history.len() / 2);

    let current = aggregate(recent_a, recent_l, recent_v);
    let previous = aggregate(prior_a, prior_l, prior_v);

    let current_json = serde_json::to_value(&current)?;
    let previous_json = serde_json::to_value(&previous)?;
    let comparison = ctx
        .state
        .gateway
        .compare_periods(&previous_json, &current_json)
        .await;

    let mut response = serde_json::to_value(comparison)?;
    if let Some(object) = response.as_object_mut() {
        object.insert("periodA".into(), previous_json);
        object.insert("periodB".into(), current_json);
    }
    Ok(Json(response))
}
