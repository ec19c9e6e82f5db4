use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::{SessionConfig, SessionRecord};

/// Write a full session row (insert or replace). Merge semantics live in
/// the pipeline, which reads the existing row first.
pub fn put_session(conn: &Connection, record: &SessionRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO sessions (id, narrative, images, config, timeline, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
             narrative = ?2, images = ?3, config = ?4, timeline = ?5, updated_at = ?6",
        params![
            record.id,
            record.narrative,
            serde_json::to_string(&record.images)?,
            serde_json::to_string(&record.config)?,
            record
                .timeline
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            record.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_session(conn: &Connection, id: &str) -> Result<Option<SessionRecord>, DatabaseError> {
    conn.query_row(
        "SELECT id, narrative, images, config, timeline, updated_at
         FROM sessions WHERE id = ?1",
        params![id],
        row_to_session,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Persist a freshly computed timeline without touching the rest of the
/// row. Does not bump `updated_at`: caching a timeline is not an edit.
pub fn set_timeline(
    conn: &Connection,
    id: &str,
    timeline: &serde_json::Value,
) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE sessions SET timeline = ?2 WHERE id = ?1",
        params![id, serde_json::to_string(timeline)?],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "session".into(),
            id: id.into(),
        });
    }
    Ok(())
}

fn row_to_session(row: &rusqlite::Row) -> Result<SessionRecord, rusqlite::Error> {
    let images: String = row.get(2)?;
    let config: String = row.get(3)?;
    let timeline: Option<String> = row.get(4)?;
    Ok(SessionRecord {
        id: row.get(0)?,
        narrative: row.get(1)?,
        images: serde_json::from_str(&images).unwrap_or_default(),
        config: serde_json::from_str::<SessionConfig>(&config).unwrap_or_default(),
        timeline: timeline.and_then(|t| serde_json::from_str(&t).ok()),
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn make_session(id: &str) -> SessionRecord {
        SessionRecord {
            id: id.into(),
            narrative: "A walk in the park.".into(),
            images: vec!["/media/a.jpg".into(), "/media/b.jpg".into()],
            config: SessionConfig::default(),
            timeline: None,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn put_and_get_round_trip() {
        let conn = open_memory_database().unwrap();
        put_session(&conn, &make_session("s1")).unwrap();

        let session = get_session(&conn, "s1").unwrap().unwrap();
        assert_eq!(session.images.len(), 2);
        assert!(session.timeline.is_none());
        assert_eq!(session.config.duration, 120);
    }

    #[test]
    fn put_overwrites_existing() {
        let conn = open_memory_database().unwrap();
        put_session(&conn, &make_session("s1")).unwrap();

        let mut updated = make_session("s1");
        updated.narrative = "A day at the beach.".into();
        put_session(&conn, &updated).unwrap();

        let session = get_session(&conn, "s1").unwrap().unwrap();
        assert_eq!(session.narrative, "A day at the beach.");
    }

    #[test]
    fn set_timeline_caches() {
        let conn = open_memory_database().unwrap();
        put_session(&conn, &make_session("s1")).unwrap();

        let timeline = serde_json::json!([
            {"imageIndex": 0, "textChunk": "A walk", "duration": 60.0, "effect": "zoom-in"},
            {"imageIndex": 1, "textChunk": "in the park.", "duration": 60.0, "effect": "pan-left"}
        ]);
        set_timeline(&conn, "s1", &timeline).unwrap();

        let session = get_session(&conn, "s1").unwrap().unwrap();
        let cached = session.timeline.unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].effect, "zoom-in");
    }

    #[test]
    fn set_timeline_unknown_session_fails() {
        let conn = open_memory_database().unwrap();
        let result = set_timeline(&conn, "missing", &serde_json::json!([]));
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn get_unknown_returns_none() {
        let conn = open_memory_database().unwrap();
        assert!(get_session(&conn, "nope").unwrap().is_none());
    }
}
