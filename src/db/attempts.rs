use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::db::LogOnError;
use crate::domain::{Attempt, Language, LogAttemptRequest, Mistake, Outcome};

pub fn insert_attempt(conn: &Connection, attempt: &Attempt) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO attempts (problem_id, user_id, attempt_number, language, code, outcome,
                          duration_minutes, mistakes, time_complexity, space_complexity, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    "#,
    params![
      attempt.problem_id,
      attempt.user_id,
      attempt.attempt_number,
      attempt.language.as_str(),
      attempt.code,
      attempt.outcome.as_str(),
      attempt.duration_minutes,
      mistakes_to_json(&attempt.mistakes),
      attempt.time_complexity,
      attempt.space_complexity,
      attempt.created_at.to_rfc3339(),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_by_id_and_problem(
  conn: &Connection,
  id: i64,
  problem_id: i64,
  user_id: i64,
) -> Result<Option<Attempt>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, problem_id, user_id, attempt_number, language, code, outcome,
           duration_minutes, mistakes, time_complexity, space_complexity, created_at
    FROM attempts WHERE id = ?1 AND problem_id = ?2 AND user_id = ?3
    "#,
  )?;

  let mut rows = stmt.query(params![id, problem_id, user_id])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row_to_attempt(row)?))
  } else {
    Ok(None)
  }
}

/// Mutable fields only; attempt_number and created_at are never reassigned
pub fn update_attempt(conn: &Connection, id: i64, req: &LogAttemptRequest) -> Result<()> {
  conn.execute(
    r#"
    UPDATE attempts
    SET language = ?1, code = ?2, outcome = ?3, duration_minutes = ?4, mistakes = ?5,
        time_complexity = ?6, space_complexity = ?7
    WHERE id = ?8
    "#,
    params![
      req.language.as_str(),
      req.code,
      req.outcome.as_str(),
      req.duration_minutes,
      mistakes_to_json(&req.mistakes),
      req.time_complexity,
      req.space_complexity,
      id,
    ],
  )?;
  Ok(())
}

pub fn delete_attempt(conn: &Connection, id: i64) -> Result<()> {
  conn.execute("DELETE FROM attempts WHERE id = ?1", params![id])?;
  Ok(())
}

pub fn count_by_problem(conn: &Connection, problem_id: i64, user_id: i64) -> Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM attempts WHERE problem_id = ?1 AND user_id = ?2",
    params![problem_id, user_id],
    |row| row.get(0),
  )
}

pub fn find_by_problem(conn: &Connection, problem_id: i64, user_id: i64) -> Result<Vec<Attempt>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, problem_id, user_id, attempt_number, language, code, outcome,
           duration_minutes, mistakes, time_complexity, space_complexity, created_at
    FROM attempts WHERE problem_id = ?1 AND user_id = ?2
    ORDER BY attempt_number
    "#,
  )?;

  stmt
    .query_map(params![problem_id, user_id], row_to_attempt)?
    .collect::<Result<Vec<_>>>()
}

pub fn find_by_problem_and_outcome(
  conn: &Connection,
  problem_id: i64,
  user_id: i64,
  outcome: Outcome,
) -> Result<Vec<Attempt>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, problem_id, user_id, attempt_number, language, code, outcome,
           duration_minutes, mistakes, time_complexity, space_complexity, created_at
    FROM attempts WHERE problem_id = ?1 AND user_id = ?2 AND outcome = ?3
    ORDER BY attempt_number
    "#,
  )?;

  stmt
    .query_map(params![problem_id, user_id, outcome.as_str()], row_to_attempt)?
    .collect::<Result<Vec<_>>>()
}

pub fn find_by_user_ordered(conn: &Connection, user_id: i64) -> Result<Vec<Attempt>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, problem_id, user_id, attempt_number, language, code, outcome,
           duration_minutes, mistakes, time_complexity, space_complexity, created_at
    FROM attempts WHERE user_id = ?1
    ORDER BY created_at ASC, id ASC
    "#,
  )?;

  stmt
    .query_map(params![user_id], row_to_attempt)?
    .collect::<Result<Vec<_>>>()
}

fn mistakes_to_json(mistakes: &[Mistake]) -> String {
  serde_json::to_string(mistakes).unwrap_or_else(|_| "[]".to_string())
}

fn row_to_attempt(row: &rusqlite::Row) -> Result<Attempt> {
  let language_str: String = row.get(4)?;
  let outcome_str: String = row.get(6)?;
  let mistakes_str: String = row.get(8)?;
  let created_str: String = row.get(11)?;

  Ok(Attempt {
    id: row.get(0)?,
    problem_id: row.get(1)?,
    user_id: row.get(2)?,
    attempt_number: row.get(3)?,
    language: Language::from_str(&language_str).unwrap_or(Language::Python),
    code: row.get(5)?,
    outcome: Outcome::from_str(&outcome_str).unwrap_or(Outcome::NotCompleted),
    duration_minutes: row.get(7)?,
    mistakes: serde_json::from_str(&mistakes_str).log_warn_default("unreadable mistakes column"),
    time_complexity: row.get(9)?,
    space_complexity: row.get(10)?,
    created_at: super::problems::parse_timestamp(&created_str),
  })
}
