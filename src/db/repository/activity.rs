use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::ActivityEntry;

/// Append a line to the family activity feed.
pub fn insert_activity(
    conn: &Connection,
    patient_id: &str,
    user: &str,
    action: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO activity_entries (id, patient_id, user, action, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            uuid::Uuid::new_v4().to_string(),
            patient_id,
            user,
            action,
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn recent_activity(
    conn: &Connection,
    patient_id: &str,
    limit: u32,
) -> Result<Vec<ActivityEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user, action, timestamp
         FROM activity_entries WHERE patient_id = ?1
         ORDER BY timestamp DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![patient_id, limit], |row| {
        Ok(ActivityEntry {
            id: row.get(0)?,
            user: row.get(1)?,
            action: row.get(2)?,
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
    fn feed_is_append_only_and_limited() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "P").unwrap();

        for i in 0..25 {
            insert_activity(&conn, "p1", "System", &format!("action {i}")).unwrap();
        }

        let feed = recent_activity(&conn, "p1", 20).unwrap();
        assert_eq!(feed.len(), 20);
    }
}
