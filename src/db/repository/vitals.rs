use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::VitalsEntry;

/// Append a vitals snapshot for a patient.
pub fn insert_vitals(
    conn: &Connection,
    patient_id: &str,
    entry: &VitalsEntry,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO vitals (patient_id, hrv, sleep_score, activity_score, medication_adherence, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patient_id,
            entry.hrv,
            entry.sleep_score,
            entry.activity_score,
            entry.medication_adherence,
            entry.timestamp,
        ],
    )?;
    Ok(())
}

/// Most recent vitals snapshot, if any.
pub fn latest_vitals(
    conn: &Connection,
    patient_id: &str,
) -> Result<Option<VitalsEntry>, DatabaseError> {
    conn.query_row(
        "SELECT hrv, sleep_score, activity_score, medication_adherence, timestamp
         FROM vitals WHERE patient_id = ?1
         ORDER BY timestamp DESC, id DESC LIMIT 1",
        params![patient_id],
        row_to_entry,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Most recent N snapshots, newest first.
pub fn recent_vitals(
    conn: &Connection,
    patient_id: &str,
    limit: u32,
) -> Result<Vec<VitalsEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT hrv, sleep_score, activity_score, medication_adherence, timestamp
         FROM vitals WHERE patient_id = ?1
         ORDER BY timestamp DESC, id DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![patient_id, limit], row_to_entry)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::from)
}

fn row_to_entry(row: &rusqlite::Row) -> Result<VitalsEntry, rusqlite::Error> {
    Ok(VitalsEntry {
        hrv: row.get(0)?,
        sleep_score: row.get(1)?,
        activity_score: row.get(2)?,
        medication_adherence: row.get(3)?,
        timestamp: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::patient::ensure_patient;
    use crate::db::sqlite::open_memory_database;

    fn make_entry(hrv: f64, ts: &str) -> VitalsEntry {
        VitalsEntry {
            hrv,
            sleep_score: 70.0,
            activity_score: 500.0,
            medication_adherence: 100.0,
            timestamp: ts.into(),
        }
    }

    #[test]
    fn latest_returns_none_for_empty() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "P").unwrap();
        assert!(latest_vitals(&conn, "p1").unwrap().is_none());
    }

    #[test]
    fn latest_returns_nth_after_n_appends() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "P").unwrap();

        for i in 0..5 {
            let ts = format!("2026-01-0{}T08:00:00Z", i + 1);
            insert_vitals(&conn, "p1", &make_entry(40.0 + i as f64, &ts)).unwrap();
        }

        let latest = latest_vitals(&conn, "p1").unwrap().unwrap();
        assert!((latest.hrv - 44.0).abs() < f64::EPSILON);
        assert_eq!(latest.timestamp, "2026-01-05T08:00:00Z");
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "P").unwrap();

        for i in 0..4 {
            let ts = format!("2026-02-0{}T08:00:00Z", i + 1);
            insert_vitals(&conn, "p1", &make_entry(50.0, &ts)).unwrap();
        }

        let recent = recent_vitals(&conn, "p1", 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].timestamp, "2026-02-04T08:00:00Z");
        assert_eq!(recent[1].timestamp, "2026-02-03T08:00:00Z");
    }

    #[test]
    fn vitals_isolated_per_patient() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "P1").unwrap();
        ensure_patient(&conn, "p2", "P2").unwrap();

        insert_vitals(&conn, "p1", &make_entry(41.0, "2026-03-01T08:00:00Z")).unwrap();
        insert_vitals(&conn, "p2", &make_entry(61.0, "2026-03-01T09:00:00Z")).unwrap();

        let p1 = latest_vitals(&conn, "p1").unwrap().unwrap();
        assert!((p1.hrv - 41.0).abs() < f64::EPSILON);
        assert_eq!(recent_vitals(&conn, "p2", 10).unwrap().len(), 1);
    }
}
