//! Domain records stored per patient.
//!
//! Wire format is camelCase to match the dashboard client; database columns
//! stay snake_case.

use serde::{Deserialize, Serialize};

use crate::gateway::types::TimelineSegment;

/// Account row. Tokens are stored hashed; the raw bearer token is only
/// ever returned once, at signup or login.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
    pub salt: String,
    pub token_hash: Option<String>,
    pub created_at: String,
}

/// Patient summary document. `current_vitals` mirrors the latest vitals
/// append for fast dashboard reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub current_vitals: Option<serde_json::Value>,
    pub last_updated: Option<String>,
    pub created_at: String,
}

/// Append-only vitals snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsEntry {
    pub hrv: f64,
    pub sleep_score: f64,
    pub activity_score: f64,
    pub medication_adherence: f64,
    pub timestamp: String,
}

/// Stored assessment result (speech, drawing or recall).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: String,
    pub kind: String,
    pub score: f64,
    pub details: serde_json::Value,
    pub timestamp: String,
}

/// Behavioral episode log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgitationLog {
    #[serde(rename = "type")]
    pub event_type: String,
    pub severity: String,
    pub context: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub invited_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub id: String,
    pub user: String,
    pub action: String,
    pub timestamp: String,
}

/// Playback configuration for a memory session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub duration: u32,
    pub music: String,
    pub text_size: String,
    pub speed: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration: 120,
            music: "Nostalgic".to_string(),
            text_size: "Medium".to_string(),
            speed: 1.0,
        }
    }
}

/// A configured narrative-plus-images playback unit. The timeline is
/// computed lazily on first playback and cached on the row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub narrative: String,
    pub images: Vec<String>,
    pub config: SessionConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<TimelineSegment>>,
    pub updated_at: String,
}
