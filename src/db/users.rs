use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

#[derive(Debug, Clone)]
pub struct User {
  pub id: i64,
  pub username: String,
  pub created_at: DateTime<Utc>,
}

/// Insert a user together with its zeroed stats row, atomically. The stats
/// record is created here and only here; the aggregator treats a missing row
/// as fatal, so a user must never be committed without one.
pub fn create_user(conn: &Connection, username: &str, now: DateTime<Utc>) -> Result<i64> {
  // unchecked_transaction: callers only hold a shared borrow (pool guard)
  let tx = conn.unchecked_transaction()?;
  tx.execute(
    "INSERT INTO users (username, created_at) VALUES (?1, ?2)",
    params![username, now.to_rfc3339()],
  )?;
  let user_id = tx.last_insert_rowid();
  super::stats::insert_zeroed(&tx, user_id)?;
  tx.commit()?;
  Ok(user_id)
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
  let mut stmt = conn.prepare("SELECT id, username, created_at FROM users WHERE id = ?1")?;
  let mut rows = stmt.query(params![id])?;
  if let Some(row) = rows.next()? {
    let created_str: String = row.get(2)?;
    Ok(Some(User {
      id: row.get(0)?,
      username: row.get(1)?,
      created_at: DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now()),
    }))
  } else {
    Ok(None)
  }
}
