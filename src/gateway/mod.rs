//! Generative analysis gateway.
//!
//! Single entry point for every model-backed task: photo analysis,
//! narrative generation, assessment grading, risk prediction, timeline
//! segmentation, and clinical reporting. The backend (remote endpoint or
//! offline simulation) is fixed at construction, and every task method is
//! infallible: model failures degrade to deterministic fallbacks instead
//! of propagating to the HTTP layer.

pub mod backend;
pub mod fallback;
pub mod parser;
pub mod prompts;
pub mod types;

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub use backend::{Backend, GatewayError, GenerateRequest, TaskKind};
pub use types::*;

use crate::config::Settings;
use crate::models::AgitationLog;

pub struct Gateway {
    backend: Backend,
}

impl Gateway {
    /// Pick the backend from settings: remote when a model URL is
    /// configured, simulated otherwise.
    pub fn from_settings(settings: &Settings) -> Self {
        let backend = match &settings.model_url {
            Some(url) => Backend::Remote(backend::RemoteClient::new(
                url.clone(),
                settings.model_name.clone(),
                settings.api_key.clone(),
            )),
            None => Backend::Simulated(backend::SimulatedBackend::new(settings.simulated_delay)),
        };
        let gateway = Self { backend };
        debug!(mode = gateway.backend.mode(), "Gateway initialized");
        gateway
    }

    pub fn simulated() -> Self {
        Self {
            backend: Backend::Simulated(backend::SimulatedBackend::new(Duration::ZERO)),
        }
    }

    #[cfg(test)]
    pub fn scripted(responses: Vec<String>) -> Self {
        Self {
            backend: Backend::Scripted(backend::ScriptedBackend::new(responses)),
        }
    }

    #[cfg(test)]
    pub fn generation_calls(&self) -> usize {
        match &self.backend {
            Backend::Scripted(script) => script.calls(),
            _ => 0,
        }
    }

    pub async fn analyze_collection(&self, media: Vec<MediaPart>) -> CollectionAnalysis {
        let request = GenerateRequest::with_media(
            TaskKind::CollectionAnalysis,
            prompts::collection_analysis(media.len()),
            media,
        );
        self.call_json(request, fallback::collection_analysis).await
    }

    pub async fn session_narrative(
        &self,
        analysis: &CollectionAnalysis,
        descriptions: &[String],
    ) -> String {
        let request = GenerateRequest::text(
            TaskKind::SessionNarrative,
            prompts::session_narrative(analysis, descriptions),
        );
        self.call_text(request, fallback::session_narrative).await
    }

    pub async fn rich_narrative(
        &self,
        image_descriptions: &[String],
        context: &str,
        tone: Tone,
    ) -> String {
        let request = GenerateRequest::text(
            TaskKind::RichNarrative,
            prompts::rich_narrative(image_descriptions, context, tone),
        );
        self.call_text(request, fallback::rich_narrative).await
    }

    pub async fn analyze_speech(&self, audio: MediaPart) -> SpeechAnalysis {
        let request = GenerateRequest::with_media(
            TaskKind::SpeechAnalysis,
            prompts::speech_analysis(),
            vec![audio],
        );
        self.call_json(request, fallback::speech_analysis).await
    }

    pub async fn analyze_drawing(&self, image: MediaPart) -> DrawingAnalysis {
        let request = GenerateRequest::with_media(
            TaskKind::DrawingAnalysis,
            prompts::drawing_analysis(),
            vec![image],
        );
        self.call_json(request, fallback::drawing_analysis).await
    }

    /// Grade a recall response. The fallback here is the exact set-based
    /// scorer, so grading works identically with no model at all.
    pub async fn evaluate_recall(
        &self,
        target_items: &[String],
        user_response: &str,
    ) -> RecallEvaluation {
        let request = GenerateRequest::text(
            TaskKind::RecallEvaluation,
            prompts::recall_evaluation(target_items, user_response),
        );
        self.call_json(request, || {
            fallback::recall_evaluation(target_items, user_response)
        })
        .await
    }

    pub async fn predict_risk(&self, context: &PatientContext) -> RiskPrediction {
        let request =
            GenerateRequest::text(TaskKind::RiskPrediction, prompts::risk_prediction(context));
        self.call_json(request, fallback::risk_prediction).await
    }

    pub async fn agitation_patterns(&self, logs: &[AgitationLog]) -> PatternAnalysis {
        let request =
            GenerateRequest::text(TaskKind::PatternAnalysis, prompts::pattern_analysis(logs));
        self.call_json(request, fallback::pattern_analysis).await
    }

    /// Raw model-proposed timeline. May be empty or the wrong length; the
    /// session pipeline normalizes it against the image count.
    pub async fn segment_timeline(
        &self,
        narrative: &str,
        image_count: usize,
        total_seconds: u32,
    ) -> Vec<TimelineSegment> {
        let request = GenerateRequest::text(
            TaskKind::TimelineSegmentation,
            prompts::timeline_segmentation(narrative, image_count, total_seconds),
        );
        let response: TimelineResponse = self
            .call_json(request, || TimelineResponse {
                timeline: Vec::new(),
            })
            .await;
        response.timeline
    }

    pub async fn clinical_insights(&self, bundle: &serde_json::Value, time_range: &str) -> String {
        let request = GenerateRequest::text(
            TaskKind::ClinicalInsights,
            prompts::clinical_insights(bundle, time_range),
        );
        self.call_text(request, fallback::clinical_insights).await
    }

    pub async fn compare_periods(
        &self,
        period_a: &serde_json::Value,
        period_b: &serde_json::Value,
    ) -> PeriodComparison {
        let request = GenerateRequest::text(
            TaskKind::PeriodComparison,
            prompts::period_comparison(period_a, period_b),
        );
        self.call_json(request, fallback::period_comparison).await
    }

    async fn call_json<T, F>(&self, request: GenerateRequest, fallback: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let kind = request.kind;
        match self.try_json::<T>(&request).await {
            Ok(value) => value,
            Err(e) => {
                warn!(task = kind.as_str(), error = %e, "Model call failed, using fallback");
                fallback()
            }
        }
    }

    async fn try_json<T: DeserializeOwned>(
        &self,
        request: &GenerateRequest,
    ) -> Result<T, GatewayError> {
        let raw = self.backend.generate(request).await?;
        let json = parser::extract_json(&raw)?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn call_text<F>(&self, request: GenerateRequest, fallback: F) -> String
    where
        F: FnOnce() -> String,
    {
        let kind = request.kind;
        match self.backend.generate(&request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!(task = kind.as_str(), "Model returned empty text, using fallback");
                fallback()
            }
            Err(e) => {
                warn!(task = kind.as_str(), error = %e, "Model call failed, using fallback");
                fallback()
            }
        }
    }
}
