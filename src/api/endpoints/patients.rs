//! Patient listing and summary metrics.

use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::repository::patient;
use crate::models::Patient;

/// Roster view for the clinician dashboard.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    user.require_role("clinician")?;
    let conn = ctx.state.open_db()?;
    Ok(Json(patient::list_patients(&conn)?))
}

/// Latest mirrored vitals for one patient. Unknown patients answer with an
/// empty object so dashboard widgets render their zero state.
pub async fn metrics(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.state.open_db()?;
    let current = patient::get_patient(&conn, &patient_id)?
        .and_then(|p| p.current_vitals)
        .unwrap_or_else(|| serde_json::json!({}));
    Ok(Json(current))
}
