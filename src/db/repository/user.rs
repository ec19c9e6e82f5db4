use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::User;

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, name, email, role, password_hash, salt, token_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user.id,
            user.name,
            user.email,
            user.role,
            user.password_hash,
            user.salt,
            user.token_hash,
            user.created_at,
        ],
    )?;
    Ok(())
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    conn.query_row(
        "SELECT id, name, email, role, password_hash, salt, token_hash, created_at
         FROM users WHERE email = ?1",
        params![email],
        row_to_user,
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// Token validation path for the auth middleware: the bearer token is
/// hashed by the caller and looked up here.
pub fn find_by_token_hash(
    conn: &Connection,
    token_hash: &str,
) -> Result<Option<User>, DatabaseError> {
    conn.query_row(
        "SELECT id, name, email, role, password_hash, salt, token_hash, created_at
         FROM users WHERE token_hash = ?1",
        params![token_hash],
        row_to_user,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn set_token_hash(
    conn: &Connection,
    user_id: &str,
    token_hash: &str,
) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE users SET token_hash = ?2 WHERE id = ?1",
        params![user_id, token_hash],
    )?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "user".into(),
            id: user_id.into(),
        });
    }
    Ok(())
}

fn row_to_user(row: &rusqlite::Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: row.get(3)?,
        password_hash: row.get(4)?,
        salt: row.get(5)?,
        token_hash: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn make_user(email: &str) -> User {
        User {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Test Carer".into(),
            email: email.into(),
            role: "caregiver".into(),
            password_hash: "hash".into(),
            salt: "salt".into(),
            token_hash: Some("token-hash".into()),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn insert_and_find_by_email() {
        let conn = open_memory_database().unwrap();
        let user = make_user("carer@example.com");
        insert_user(&conn, &user).unwrap();

        let found = find_by_email(&conn, "carer@example.com").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.role, "caregiver");
    }

    #[test]
    fn duplicate_email_rejected() {
        let conn = open_memory_database().unwrap();
        insert_user(&conn, &make_user("dup@example.com")).unwrap();
        let result = insert_user(&conn, &make_user("dup@example.com"));
        assert!(result.is_err());
    }

    #[test]
    fn find_by_token_hash_works() {
        let conn = open_memory_database().unwrap();
        let user = make_user("t@example.com");
        insert_user(&conn, &user).unwrap();

        let found = find_by_token_hash(&conn, "token-hash").unwrap();
        assert!(found.is_some());
        assert!(find_by_token_hash(&conn, "wrong").unwrap().is_none());
    }

    #[test]
    fn set_token_hash_rotates() {
        let conn = open_memory_database().unwrap();
        let user = make_user("r@example.com");
        insert_user(&conn, &user).unwrap();

        set_token_hash(&conn, &user.id, "new-hash").unwrap();
        assert!(find_by_token_hash(&conn, "token-hash").unwrap().is_none());
        assert!(find_by_token_hash(&conn, "new-hash").unwrap().is_some());
    }

    #[test]
    fn set_token_hash_unknown_user_fails() {
        let conn = open_memory_database().unwrap();
        let result = set_token_hash(&conn, "nobody", "hash");
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
