use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::FamilyMember;

/// Append a family member with "Pending" invitation status.
pub fn insert_member(
    conn: &Connection,
    patient_id: &str,
    name: &str,
    email: &str,
    role: &str,
) -> Result<FamilyMember, DatabaseError> {
    let member = FamilyMember {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.into(),
        email: email.into(),
        role: role.into(),
        status: "Pending".into(),
        invited_at: chrono::Utc::now().to_rfc3339(),
    };
    conn.execute(
        "INSERT INTO family_members (id, patient_id, name, email, role, status, invited_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            member.id,
            patient_id,
            member.name,
            member.email,
            member.role,
            member.status,
            member.invited_at,
        ],
    )?;
    Ok(member)
}

pub fn list_members(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<FamilyMember>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, role, status, invited_at
         FROM family_members WHERE patient_id = ?1
         ORDER BY invited_at DESC",
    )?;
    let rows = stmt.query_map(params![patient_id], |row| {
        Ok(FamilyMember {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            role: row.get(3)?,
            status: row.get(4)?,
            invited_at: row.get(5)?,
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
    fn invited_member_starts_pending() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "P").unwrap();

        let member =
            insert_member(&conn, "p1", "Susan", "susan@example.com", "Daughter").unwrap();
        assert_eq!(member.status, "Pending");

        let members = list_members(&conn, "p1").unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].email, "susan@example.com");
    }

    #[test]
    fn members_scoped_to_patient() {
        let conn = open_memory_database().unwrap();
        ensure_patient(&conn, "p1", "P1").unwrap();
        ensure_patient(&conn, "p2", "P2").unwrap();

        insert_member(&conn, "p1", "Susan", "s@example.com", "Daughter").unwrap();
        assert!(list_members(&conn, "p2").unwrap().is_empty());
    }
}
