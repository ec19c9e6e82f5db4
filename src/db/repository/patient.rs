use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::Patient;

/// Create the patient row if it does not exist yet. Sub-collection writes
/// call this so that a patient created on signup and a patient first seen
/// through a vitals push behave the same.
pub fn ensure_patient(conn: &Connection, id: &str, name: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, name, created_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO NOTHING",
        params![id, name, chrono::Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

/// Merge-upsert of the summary document: mirrors the latest vitals entry
/// onto the patient row for fast reads.
pub fn update_summary(
    conn: &Connection,
    id: &str,
    current_vitals: &serde_json::Value,
) -> Result<(), DatabaseError> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO patients (id, name, current_vitals, last_updated, created_at)
         VALUES (?1, ?1, ?2, ?3, ?3)
         ON CONFLICT(id) DO UPDATE SET current_vitals = ?2, last_updated = ?3",
        params![id, serde_json::to_string(current_vitals)?, now],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &str) -> Result<Option<Patient>, DatabaseError> {
    conn.query_row(
        "SELECT id, name, current_vitals, last_updated, created_at
         FROM patients WHERE id = ?1",
        params![id],
        row_to_patient,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, current_vitals, last_updated, created_at
         FROM patients ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map([], row_to_patient)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::from)
}

fn row_to_patient(row: &rusqlite::Row) -> Result<Patient, rusqlite::Error> {
    let vitals_json: Option<String> = row.get(2)?;
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        current_vitals: vitals_json.and_then(|s| serde_json::from_str(&s).ok()),
        last_updated: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn ensure_patient_is_idempotent() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "Margaret").unwrap();
        ensure_patient(&conn, "p1", "Margaret").unwrap();
        let patients = list_patients(&conn).unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].name, "Margaret");
    }

    #[test]
    fn update_summary_creates_and_merges() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "Margaret").unwrap();

        let vitals = serde_json::json!({"hrv": 48.0, "sleepScore": 70.0});
        update_summary(&conn, "p1", &vitals).unwrap();

        let patient = get_patient(&conn, "p1").unwrap().unwrap();
        assert_eq!(patient.name, "Margaret");
        assert_eq!(patient.current_vitals.unwrap()["hrv"], 48.0);
        assert!(patient.last_updated.is_some());
    }

    #[test]
    fn get_patient_returns_none_for_unknown() {
        let conn = open_memory_database().unwrap();
        assert!(get_patient(&conn, "nobody").unwrap().is_none());
    }
}
