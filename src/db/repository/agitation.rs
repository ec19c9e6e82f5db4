use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::AgitationLog;

pub fn insert_log(
    conn: &Connection,
    patient_id: &str,
    log: &AgitationLog,
) -> Result<String, DatabaseError> {
    let id = uuid::Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO agitation_logs (id, patient_id, event_type, severity, context, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            patient_id,
            log.event_type,
            log.severity,
            log.context,
            log.timestamp,
        ],
    )?;
    Ok(id)
}

pub fn recent_logs(
    conn: &Connection,
    patient_id: &str,
    limit: u32,
) -> Result<Vec<AgitationLog>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT event_type, severity, context, timestamp
         FROM agitation_logs WHERE patient_id = ?1
         ORDER BY timestamp DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![patient_id, limit], |row| {
        Ok(AgitationLog {
            event_type: row.get(0)?,
            severity: row.get(1)?,
            context: row.get(2)?,
            timestamp: row.get(3)?,
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

    #[test]
    fn insert_and_list_logs() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "P").unwrap();

        let log = AgitationLog {
            event_type: "Agitation".into(),
            severity: "High".into(),
            context: "Sundowning suspect".into(),
            timestamp: "2026-01-01T14:00:00Z".into(),
        };
        let id = insert_log(&conn, "p1", &log).unwrap();
        assert!(!id.is_empty());

        let logs = recent_logs(&conn, "p1", 20).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].severity, "High");
    }

    #[test]
    fn empty_store_returns_empty() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "P").unwrap();
        assert!(recent_logs(&conn, "p1", 20).unwrap().is_empty());
    }
}
