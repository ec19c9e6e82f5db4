//! Typed response contracts for every gateway task.
//!
//! The model is asked for JSON matching these shapes; anything that fails
//! to parse degrades to the task's fallback value (`fallback` module).

use serde::{Deserialize, Serialize};

/// Binary media forwarded to the model (image or audio).
#[derive(Debug, Clone)]
pub struct MediaPart {
    pub mime: String,
    pub data: Vec<u8>,
}

/// Narrative register requested by the caregiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Calming,
    Engaging,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Calming => "Calming",
            Tone::Engaging => "Engaging",
        }
    }
}

impl Default for Tone {
    fn default() -> Self {
        Tone::Calming
    }
}

/// Summary of an uploaded photo collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionAnalysis {
    pub face_count: u32,
    pub emotions: Vec<EmotionShare>,
    pub scene: String,
    pub themes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionShare {
    pub name: String,
    pub value: f64,
}

/// Verbal fluency metrics extracted from an audio recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechAnalysis {
    pub pace: f64,
    pub clarity: f64,
    pub repetition_count: u32,
    pub vocabulary_richness: f64,
    pub fluency_score: f64,
    pub transcript: String,
}

/// Clock Drawing Test grading. The multi-axis variant is canonical:
/// three 0-10 sub-scores aggregated into a 0-30 total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingAnalysis {
    pub shape_recognition: String,
    pub spatial_accuracy: f64,
    pub hand_placement: f64,
    pub symmetry_score: f64,
    pub total_score: f64,
    pub observations: Vec<String>,
}

/// Memory recall grading. All fields are required so a degenerate `{}`
/// response falls through to the deterministic scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallEvaluation {
    pub accuracy: u32,
    pub correct_items: Vec<String>,
    pub missed_items: Vec<String>,
    pub intrusions: Vec<String>,
    pub analysis: String,
}

/// Patient state snapshot fed to the agitation risk predictor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientContext {
    pub mood_trend: String,
    pub sleep_score: f64,
    pub activity_level: String,
    pub hrv: f64,
    #[serde(default)]
    pub recent_interactions: Vec<String>,
    pub medication_adherence: bool,
}

/// 48-hour agitation risk outlook in twelve 4-hour blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskPrediction {
    pub risk_score: u32,
    pub risk_label: String,
    #[serde(default)]
    pub contributing_factors: Vec<String>,
    #[serde(default)]
    pub forecast: Vec<ForecastBlock>,
    #[serde(default)]
    pub recommended_interventions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastBlock {
    pub time: String,
    pub risk_level: u32,
}

/// Weekly agitation heatmap plus identified triggers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAnalysis {
    pub heatmap: Vec<HeatmapDay>,
    pub triggers: Vec<String>,
    #[serde(default)]
    pub weekly_trend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapDay {
    pub day: String,
    pub morning: f64,
    pub afternoon: f64,
    pub evening: f64,
    pub night: f64,
}

/// One segment of a session playback timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSegment {
    pub image_index: usize,
    pub text_chunk: String,
    pub duration: f64,
    pub effect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub timeline: Vec<TimelineSegment>,
}

/// Period-over-period analytics comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub trends: Vec<TrendEntry>,
    pub summary: String,
    #[serde(default)]
    pub statistical_note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendEntry {
    pub metric: String,
    pub direction: String,
    pub significance: String,
    #[serde(default)]
    pub details: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_prediction_wire_format_is_camel_case() {
        let json = r#"{
            "riskScore": 62,
            "riskLabel": "Moderate",
            "contributingFactors": ["Poor sleep"],
            "forecast": [{"time": "12:00", "riskLevel": 40}],
            "recommendedInterventions": ["Quiet environment"]
        }"#;
        let prediction: RiskPrediction = serde_json::from_str(json).unwrap();
        assert_eq!(prediction.risk_score, 62);
        assert_eq!(prediction.forecast[0].risk_level, 40);
    }

    #[test]
    fn recall_evaluation_rejects_empty_object() {
        let result: Result<RecallEvaluation, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn collection_analysis_estimated_date_optional() {
        let json = r#"{"faceCount": 2, "emotions": [], "scene": "Park", "themes": ["Nature"]}"#;
        let analysis: CollectionAnalysis = serde_json::from_str(json).unwrap();
        assert!(analysis.estimated_date.is_none());
    }

    #[test]
    fn timeline_segment_round_trips() {
        let segment = TimelineSegment {
            image_index: 1,
            text_chunk: "The garden in June.".into(),
            duration: 40.0,
            effect: "pan-left".into(),
        };
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["imageIndex"], 1);
        assert_eq!(json["textChunk"], "The garden in June.");
    }
}
