//! Memory session pipeline.
//!
//! Sessions are configured incrementally (merge-upsert) and compiled into a
//! playback timeline lazily: the first playback computes the timeline via
//! the gateway, normalizes it against the image set, and caches it on the
//! row. Later playbacks reuse the cache. Reconfiguring a session does not
//! invalidate a cached timeline.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::repository::session;
use crate::db::DatabaseError;
use crate::gateway::{Gateway, TimelineSegment};
use crate::models::{SessionConfig, SessionRecord};

const EFFECTS: [&str; 4] = ["zoom-in", "pan-left", "zoom-out", "pan-right"];

/// Partial session update. Absent fields keep their stored value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub session_id: String,
    #[serde(default)]
    pub narrative: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub config: Option<ConfigPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub music: Option<String>,
    #[serde(default)]
    pub text_size: Option<String>,
    #[serde(default)]
    pub speed: Option<f64>,
}

impl ConfigPatch {
    fn apply(&self, base: SessionConfig) -> SessionConfig {
        SessionConfig {
            duration: self.duration.unwrap_or(base.duration),
            music: self.music.clone().unwrap_or(base.music),
            text_size: self.text_size.clone().unwrap_or(base.text_size),
            speed: self.speed.unwrap_or(base.speed),
        }
    }
}

/// Everything the player needs to run a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackData {
    pub session_id: String,
    pub config: SessionConfig,
    pub audio_track_url: String,
    pub timeline: Vec<TimelineSegment>,
    pub images: Vec<String>,
}

/// Merge a partial update into the stored session, creating the row with
/// defaults when it does not exist yet.
pub fn configure_session(
    conn: &Connection,
    update: &SessionUpdate,
) -> Result<SessionRecord, DatabaseError> {
    let existing = session::get_session(conn, &update.session_id)?;
    let base = existing.unwrap_or_else(|| SessionRecord {
        id: update.session_id.clone(),
        narrative: String::new(),
        images: Vec::new(),
        config: SessionConfig::default(),
        timeline: None,
        updated_at: String::new(),
    });

    let record = SessionRecord {
        id: base.id,
        narrative: update.narrative.clone().unwrap_or(base.narrative),
        images: update.images.clone().unwrap_or(base.images),
        config: match &update.config {
            Some(patch) => patch.apply(base.config),
            None => base.config,
        },
        timeline: base.timeline,
        updated_at: chrono::Utc::now().to_rfc3339(),
    };

    session::put_session(conn, &record)?;
    Ok(record)
}

/// Resolve a session into playback data, computing and caching the
/// timeline on first use.
pub async fn playback(
    conn: &mut Connection,
    gateway: &Gateway,
    session_id: &str,
) -> Result<PlaybackData, DatabaseError> {
    let record = session::get_session(conn, session_id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "session".into(),
        id: session_id.into(),
    })?;

    let timeline = match record.timeline {
        Some(cached) => cached,
        None => {
            let image_count = record.images.len();
            let raw = gateway
                .segment_timeline(&record.narrative, image_count, record.config.duration)
                .await;
            let timeline = normalize_timeline(
                raw,
                &record.narrative,
                image_count,
                record.config.duration,
            );
            session::set_timeline(conn, session_id, &serde_json::to_value(&timeline)?)?;
            debug!(session_id, segments = timeline.len(), "Timeline computed and cached");
            timeline
        }
    };

    Ok(PlaybackData {
        session_id: record.id,
        config: record.config.clone(),
        audio_track_url: format!("/assets/music/{}.mp3", record.config.music.to_lowercase()),
        timeline,
        images: record.images,
    })
}

/// Force a model-proposed timeline into the playback contract: exactly one
/// segment per image, valid indices, durations summing to the configured
/// total. Anything unusable is replaced by even segmentation.
pub fn normalize_timeline(
    raw: Vec<TimelineSegment>,
    narrative: &str,
    image_count: usize,
    total_seconds: u32,
) -> Vec<TimelineSegment> {
    if image_count == 0 {
        return Vec::new();
    }
    if raw.len() != image_count {
        return evenly_segment(narrative, image_count, total_seconds);
    }

    let mut timeline: Vec<TimelineSegment> = raw
        .into_iter()
        .enumerate()
        .map(|(i, mut segment)| {
            if segment.image_index >= image_count {
                segment.image_index = i;
            }
            if segment.effect.is_empty() {
                segment.effect = EFFECTS[i % EFFECTS.len()].to_string();
            }
            segment
        })
        .collect();

    let sum: f64 = timeline.iter().map(|s| s.duration).sum();
    if sum <= 0.0 {
        let even = total_seconds as f64 / image_count as f64;
        for segment in &mut timeline {
            segment.duration = even;
        }
    } else {
        let scale = total_seconds as f64 / sum;
        for segment in &mut timeline {
            segment.duration *= scale;
        }
    }
    timeline
}

/// Deterministic fallback segmentation: split the narrative into as many
/// near-equal word chunks as there are images, with durations proportional
/// to chunk length.
pub fn evenly_segment(
    narrative: &str,
    image_count: usize,
    total_seconds: u32,
) -> Vec<TimelineSegment> {
    if image_count == 0 {
        return Vec::new();
    }

    let words: Vec<&str> = narrative.split_whitespace().collect();
    let mut chunks: Vec<String> = Vec::with_capacity(image_count);
    if words.is_empty() {
        chunks.resize(image_count, String::new());
    } else {
        let per_chunk = words.len().div_ceil(image_count);
        for i in 0..image_count {
            let start = (i * per_chunk).min(words.len());
            let end = ((i + 1) * per_chunk).min(words.len());
            chunks.push(words[start..end].join(" "));
        }
    }

    let weights: Vec<f64> = chunks
        .iter()
        .map(|c| c.split_whitespace().count().max(1) as f64)
        .collect();
    let total_weight: f64 = weights.iter().sum();
    let total = total_seconds as f64;

    let mut timeline = Vec::with_capacity(image_count);
    let mut allocated = 0.0;
    for (i, chunk) in chunks.into_iter().enumerate() {
        let duration = if i == image_count - 1 {
            total - allocated
        } else {
            let d = total * weights[i] / total_weight;
            allocated += d;
            d
        };
        timeline.push(TimelineSegment {
            image_index: i,
            text_chunk: chunk,
            duration,
            effect: EFFECTS[i % EFFECTS.len()].to_string(),
        });
    }
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn seed_session(conn: &Connection, id: &str, images: usize) {
        let update = SessionUpdate {
            session_id: id.into(),
            narrative: Some(
                "The garden was full of roses that June. Everyone gathered under \
                 the old oak tree and the afternoon stretched on warm and slow."
                    .into(),
            ),
            images: Some((0..images).map(|i| format!("/media/{i}.jpg")).collect()),
            config: None,
        };
        configure_session(conn, &update).unwrap();
    }

    #[test]
    fn configure_creates_with_defaults_then_merges() {
        let conn = open_memory_database().unwrap();
        seed_session(&conn, "s1", 2);

        let record = configure_session(
            &conn,
            &SessionUpdate {
                session_id: "s1".into(),
                narrative: None,
                images: None,
                config: Some(ConfigPatch {
                    music: Some("Classical".into()),
                    ..ConfigPatch::default()
                }),
            },
        )
        .unwrap();

        // Patched field applied, untouched fields kept.
        assert_eq!(record.config.music, "Classical");
        assert_eq!(record.config.duration, 120);
        assert_eq!(record.images.len(), 2);
        assert!(record.narrative.starts_with("The garden"));
    }

    #[test]
    fn even_segmentation_matches_image_count_and_duration() {
        let narrative = "one two three four five six seven eight nine ten";
        let timeline = evenly_segment(narrative, 3, 120);
        assert_eq!(timeline.len(), 3);
        let sum: f64 = timeline.iter().map(|s| s.duration).sum();
        assert!((sum - 120.0).abs() < 1e-9);
        assert_eq!(timeline[0].effect, "zoom-in");
        assert_eq!(timeline[1].effect, "pan-left");
        let joined: Vec<String> = timeline.iter().map(|s| s.text_chunk.clone()).collect();
        assert_eq!(joined.join(" "), narrative);
    }

    #[test]
    fn even_segmentation_handles_empty_narrative() {
        let timeline = evenly_segment("", 2, 60);
        assert_eq!(timeline.len(), 2);
        let sum: f64 = timeline.iter().map(|s| s.duration).sum();
        assert!((sum - 60.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_rejects_wrong_chunk_count() {
        let raw = vec![TimelineSegment {
            image_index: 0,
            text_chunk: "everything at once".into(),
            duration: 120.0,
            effect: "zoom-in".into(),
        }];
        let timeline = normalize_timeline(raw, "a b c d", 4, 120);
        assert_eq!(timeline.len(), 4);
    }

    #[test]
    fn normalize_rescales_durations_and_clamps_indices() {
        let raw = vec![
            TimelineSegment {
                image_index: 0,
                text_chunk: "first".into(),
                duration: 10.0,
                effect: "zoom-in".into(),
            },
            TimelineSegment {
                image_index: 9,
                text_chunk: "second".into(),
                duration: 30.0,
                effect: String::new(),
            },
        ];
        let timeline = normalize_timeline(raw, "first second", 2, 120);
        assert_eq!(timeline.len(), 2);
        assert!((timeline[0].duration - 30.0).abs() < 1e-9);
        assert!((timeline[1].duration - 90.0).abs() < 1e-9);
        assert_eq!(timeline[1].image_index, 1);
        assert_eq!(timeline[1].effect, "pan-left");
    }

    #[tokio::test]
    async fn playback_unknown_session_is_not_found() {
        let mut conn = open_memory_database().unwrap();
        let gateway = Gateway::simulated();
        let result = playback(&mut conn, &gateway, "missing").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn first_playback_computes_then_caches() {
        let mut conn = open_memory_database().unwrap();
        seed_session(&conn, "s1", 3);

        let gateway = Gateway::scripted(vec![
            r#"{"timeline": [
                {"imageIndex": 0, "textChunk": "The garden", "duration": 40, "effect": "zoom-in"},
                {"imageIndex": 1, "textChunk": "in June", "duration": 40, "effect": "pan-left"},
                {"imageIndex": 2, "textChunk": "warm and slow", "duration": 40, "effect": "zoom-out"}
            ]}"#
            .into(),
        ]);

        let first = playback(&mut conn, &gateway, "s1").await.unwrap();
        assert_eq!(first.timeline.len(), 3);
        assert_eq!(gateway.generation_calls(), 1);

        // Second playback must not regenerate; the script is exhausted, so
        // a second call would fail into the even fallback and differ.
        let second = playback(&mut conn, &gateway, "s1").await.unwrap();
        assert_eq!(gateway.generation_calls(), 1);
        assert_eq!(second.timeline, first.timeline);
    }

    #[tokio::test]
    async fn playback_resolves_audio_track_from_music_choice() {
        let mut conn = open_memory_database().unwrap();
        seed_session(&conn, "s1", 1);
        configure_session(
            &conn,
            &SessionUpdate {
                session_id: "s1".into(),
                narrative: None,
                images: None,
                config: Some(ConfigPatch {
                    music: Some("Classical".into()),
                    ..ConfigPatch::default()
                }),
            },
        )
        .unwrap();

        let gateway = Gateway::simulated();
        let data = playback(&mut conn, &gateway, "s1").await.unwrap();
        assert_eq!(data.audio_track_url, "/assets/music/classical.mp3");
    }

    #[tokio::test]
    async fn simulated_playback_falls_back_to_even_segmentation() {
        // Simulation returns an empty timeline, which fails the
        // one-segment-per-image contract and triggers even segmentation.
        let mut conn = open_memory_database().unwrap();
        seed_session(&conn, "s1", 4);

        let gateway = Gateway::simulated();
        let data = playback(&mut conn, &gateway, "s1").await.unwrap();
        assert_eq!(data.timeline.len(), 4);
        let sum: f64 = data.timeline.iter().map(|s| s.duration).sum();
        assert!((sum - 120.0).abs() < 1e-9);
    }
}
