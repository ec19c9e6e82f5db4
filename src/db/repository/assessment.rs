use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::AssessmentRecord;

pub fn insert_assessment(
    conn: &Connection,
    patient_id: &str,
    record: &AssessmentRecord,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO assessments (id, patient_id, kind, score, details, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.id,
            patient_id,
            record.kind,
            record.score,
            serde_json::to_string(&record.details)?,
            record.timestamp,
        ],
    )?;
    Ok(())
}

pub fn recent_assessments(
    conn: &Connection,
    patient_id: &str,
    limit: u32,
) -> Result<Vec<AssessmentRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, score, details, timestamp
         FROM assessments WHERE patient_id = ?1
         ORDER BY timestamp DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![patient_id, limit], |row| {
        let details: String = row.get(3)?;
        Ok(AssessmentRecord {
            id: row.get(0)?,
            kind: row.get(1)?,
            score: row.get(2)?,
            details: serde_json::from_str(&details).unwrap_or(serde_json::Value::Null),
            timestamp: row.get(4)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::patient::ensure_patient;
    use crate::db::sqlite::open_memory_database;

    fn make_record(kind: &str, score: f64, ts: &str) -> AssessmentRecord {
        AssessmentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            kind: kind.into(),
            score,
            details: serde_json::json!({"observations": []}),
            timestamp: ts.into(),
        }
    }

    #[test]
    fn insert_and_list_newest_first() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "P").unwrap();

        insert_assessment(&conn, "p1", &make_record("Drawing", 22.0, "2026-01-01T10:00:00Z"))
            .unwrap();
        insert_assessment(&conn, "p1", &make_record("Recall", 67.0, "2026-01-02T10:00:00Z"))
            .unwrap();

        let records = recent_assessments(&conn, "p1", 10).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, "Recall");
        assert!((records[0].score - 67.0).abs() < f64::EPSILON);
    }

    #[test]
    fn limit_applies() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "P").unwrap();
        for i in 0..5 {
            let ts = format!("2026-01-0{}T10:00:00Z", i + 1);
            insert_assessment(&conn, "p1", &make_record("Speech", 80.0, &ts)).unwrap();
        }
        assert_eq!(recent_assessments(&conn, "p1", 3).unwrap().len(), 3);
    }
}
