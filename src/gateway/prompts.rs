//! Prompt construction for every gateway task.
//!
//! Each prompt states the task, the input data, and the exact JSON shape
//! expected back. Free-text tasks ask for plain prose instead.

use crate::models::AgitationLog;

use super::types::{CollectionAnalysis, PatientContext, Tone};

pub const SYSTEM: &str = "You are the analysis engine of a dementia caregiving \
dashboard. Answer precisely in the requested format and nothing else.";

pub fn collection_analysis(image_count: usize) -> String {
    format!(
        "Analyze these {image_count} images for a dementia memory therapy application.\n\
         Provide a JSON summary with the following fields:\n\
         - faceCount: total number of distinct faces detected across images.\n\
         - emotions: array of objects {{\"name\": string, \"value\": number}} giving the \
           percentage (0-100) of detected emotions (e.g. Happy, Calm, Nostalgic).\n\
         - scene: a generic classification of the setting (e.g. \"Outdoor Park\").\n\
         - themes: array of strings (e.g. \"Wedding\", \"Birthday\", \"Nature\").\n\
         - estimatedDate: a rough guess of the decade based on fashion/quality.\n\
         Return ONLY valid JSON."
    )
}

pub fn session_narrative(analysis: &CollectionAnalysis, descriptions: &[String]) -> String {
    let emotions = analysis
        .emotions
        .iter()
        .map(|e| format!("{} ({}%)", e.name, e.value))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Create a therapeutic narrative for a dementia patient based on these memory details:\n\
         Themes: {}\nScene: {}\nEmotions: {}\nAdditional context: {}\n\n\
         The story should be calming and engaging, under 150 words, focused on sensory \
         details (light, sound, feeling), with a warm, reminiscent tone. Output plain text.",
        analysis.themes.join(", "),
        analysis.scene,
        emotions,
        descriptions.join(". "),
    )
}

pub fn rich_narrative(image_descriptions: &[String], context: &str, tone: Tone) -> String {
    format!(
        "Write a rich, therapeutic narrative story for a dementia memory session.\n\n\
         Inputs:\n- Visual contexts: {}\n- User descriptions: {}\n- Tone: {}\n\n\
         Requirements: clear paragraphs, evocative sensory language, the story flows \
         naturally between the scenes described, approximately 300 words. Output plain text.",
        image_descriptions.join("; "),
        context,
        tone.as_str(),
    )
}

pub fn speech_analysis() -> String {
    "Analyze this audio recording of a cognitive assessment (verbal fluency test).\n\
     Extract the following metrics in JSON format:\n\
     - pace: estimated words per minute (number).\n\
     - clarity: score 0-100 based on articulation.\n\
     - repetitionCount: number of repeated words or phrases (integer).\n\
     - vocabularyRichness: score 0-100 based on unique word usage.\n\
     - fluencyScore: overall score 0-100 indicating cognitive fluency.\n\
     - transcript: a brief transcription of the content.\n\
     Return ONLY valid JSON."
        .to_string()
}

pub fn drawing_analysis() -> String {
    "Analyze this image of a Clock Drawing Test (CDT) for cognitive assessment.\n\
     Provide a JSON output with:\n\
     - shapeRecognition: \"Intact\" or \"Distorted\".\n\
     - spatialAccuracy: score 0-10 (correct placement of numbers).\n\
     - handPlacement: score 0-10 (correct time setting).\n\
     - symmetryScore: score 0-10.\n\
     - totalScore: aggregate score 0-30.\n\
     - observations: array of specific issues detected (e.g. \"Missing number 12\").\n\
     Return ONLY valid JSON."
        .to_string()
}

pub fn recall_evaluation(target_items: &[String], user_response: &str) -> String {
    format!(
        "Evaluate a memory recall test.\n\
         Target items: {}.\nUser response: \"{}\".\n\n\
         Provide JSON output:\n\
         - accuracy: percentage 0-100 (integer).\n\
         - correctItems: array of items correctly recalled.\n\
         - missedItems: array of items missed.\n\
         - intrusions: array of items mentioned that were not in the target list.\n\
         - analysis: brief text describing the recall performance.\n\
         Return ONLY valid JSON.",
        target_items.join(", "),
        user_response,
    )
}

pub fn risk_prediction(context: &PatientContext) -> String {
    format!(
        "Act as a medical predictive analytics model for dementia care.\n\
         Analyze the following patient data to predict agitation risk for the next 48 hours.\n\n\
         Patient data:\n\
         - Mood trend: {}\n- Sleep quality score: {}/100\n- Activity level: {}\n\
         - HRV (ms): {}\n- Recent interactions: {:?}\n- Medication adherence: {}\n\n\
         Output a JSON object with:\n\
         1. \"riskScore\": integer 0-100.\n\
         2. \"riskLabel\": \"Low\", \"Moderate\", or \"High\".\n\
         3. \"contributingFactors\": array of strings explaining why.\n\
         4. \"forecast\": array of exactly 12 four-hour blocks covering the next 48 hours, \
            each {{\"time\": \"HH:MM\", \"riskLevel\": integer 0-100}}.\n\
         5. \"recommendedInterventions\": array of strings.\n\
         Return ONLY valid JSON.",
        context.mood_trend,
        context.sleep_score,
        context.activity_level,
        context.hrv,
        context.recent_interactions,
        if context.medication_adherence { "Yes" } else { "No" },
    )
}

pub fn pattern_analysis(logs: &[AgitationLog]) -> String {
    // Cap the history to keep the prompt within context limits.
    let recent: Vec<_> = logs.iter().take(50).collect();
    format!(
        "Analyze these historical patient logs to identify agitation patterns.\n\
         Logs: {}\n\n\
         Output JSON:\n\
         1. \"heatmap\": array of 7 objects, one per weekday, \
            {{\"day\": \"Mon\", \"morning\": n, \"afternoon\": n, \"evening\": n, \"night\": n}} \
            where numbers are 0-100 intensity.\n\
         2. \"triggers\": array of strings (e.g. \"Loud noises\", \"Sundowning\").\n\
         3. \"weeklyTrend\": string description of the trend.\n\
         Return ONLY valid JSON.",
        serde_json::to_string(&recent).unwrap_or_else(|_| "[]".into()),
    )
}

pub fn timeline_segmentation(narrative: &str, image_count: usize, total_seconds: u32) -> String {
    format!(
        "Create a timeline for a memory video session.\n\n\
         Narrative: \"{narrative}\"\n\
         Number of images available: {image_count}\n\
         Total duration: {total_seconds} seconds.\n\n\
         Task:\n\
         1. Break the narrative into exactly {image_count} logical text chunks.\n\
         2. Assign each chunk to an image index (0 to {last}).\n\
         3. Calculate the duration of each segment from its text length, summing to \
            approximately {total_seconds} seconds.\n\
         4. Suggest a Ken Burns effect for each image (\"zoom-in\", \"pan-left\", \"zoom-out\").\n\n\
         Output JSON: {{\"timeline\": [{{\"imageIndex\": number, \"textChunk\": string, \
         \"duration\": number, \"effect\": string}}]}}",
        last = image_count.saturating_sub(1),
    )
}

pub fn clinical_insights(bundle: &serde_json::Value, time_range: &str) -> String {
    format!(
        "Act as a senior neurologist specializing in geriatric care.\n\
         Analyze the following patient data collected over the {time_range}.\n\n\
         Data: {bundle}\n\n\
         Provide a clinical summary (max 300 words) addressing:\n\
         1. Cognitive progression vs baseline.\n\
         2. Correlations between physiological signs and behavioral episodes.\n\
         3. Effectiveness of current interventions.\n\
         4. Recommended adjustments to the care plan.\n\
         Format as a professional medical report section (plain text)."
    )
}

pub fn period_comparison(period_a: &serde_json::Value, period_b: &serde_json::Value) -> String {
    format!(
        "Compare these two datasets for a dementia patient.\n\n\
         Period A (previous): {period_a}\nPeriod B (current): {period_b}\n\n\
         Output a JSON object with:\n\
         1. \"trends\": array of objects {{\"metric\": string, \"direction\": \
            \"Improvement\"|\"Decline\"|\"Stable\", \"significance\": \"High\"|\"Low\", \
            \"details\": string}}.\n\
         2. \"summary\": a brief paragraph summarizing the trajectory.\n\
         3. \"statisticalNote\": whether changes are likely significant or within variance.\n\
         Return ONLY valid JSON."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_prompt_names_exact_chunk_count() {
        let prompt = timeline_segmentation("A story.", 4, 120);
        assert!(prompt.contains("exactly 4 logical text chunks"));
        assert!(prompt.contains("(0 to 3)"));
    }

    #[test]
    fn risk_prompt_includes_patient_data() {
        let context = PatientContext {
            mood_trend: "Declining".into(),
            sleep_score: 55.0,
            activity_level: "Low".into(),
            hrv: 38.0,
            recent_interactions: vec!["Refused meal".into()],
            medication_adherence: false,
        };
        let prompt = risk_prediction(&context);
        assert!(prompt.contains("Declining"));
        assert!(prompt.contains("55/100"));
        assert!(prompt.contains("Medication adherence: No"));
        assert!(prompt.contains("exactly 12 four-hour blocks"));
    }
}
