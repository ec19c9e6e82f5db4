//! Family circle: member roster, invitations, and the shared activity feed.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::{activity, family, patient};
use crate::models::{ActivityEntry, FamilyMember};

pub async fn members(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<FamilyMember>>, ApiError> {
    let conn = ctx.state.open_db()?;
    Ok(Json(family::list_members(&conn, &patient_id)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub patient_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

pub async fn invite(
    State(ctx): State<ApiContext>,
    Json(body): Json<InviteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(patient_id), Some(name), Some(email), Some(role)) =
        (body.patient_id, body.name, body.email, body.role)
    else {
        return Err(ApiError::BadRequest(
            "patientId, name, email and role are required".into(),
        ));
    };

    let conn = ctx.state.open_db()?;
    patient::ensure_patient(&conn, &patient_id, &patient_id)?;
    let member = family::insert_member(&conn, &patient_id, &name, &email, &role)?;
    activity::insert_activity(
        &conn,
        &patient_id,
        "System",
        &format!("invited {} ({})", member.name, member.role),
    )?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Invitation sent",
        "member": member,
    })))
}

pub async fn activity_feed(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<ActivityEntry>>, ApiError> {
    let conn = ctx.state.open_db()?;
    Ok(Json(activity::recent_activity(&conn, &patient_id, 20)?))
}
