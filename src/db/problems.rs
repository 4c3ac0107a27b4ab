use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::{CreateProblemRequest, Difficulty, Problem, ProblemStatus};

pub fn insert_problem(
  conn: &Connection,
  user_id: i64,
  req: &CreateProblemRequest,
  now: DateTime<Utc>,
) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO problems (user_id, external_id, title, url, difficulty, status, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
    "#,
    params![
      user_id,
      req.external_id,
      req.title,
      req.url,
      req.difficulty.as_str(),
      ProblemStatus::Unseen.as_str(),
      now.to_rfc3339(),
    ],
  )?;
  let problem_id = conn.last_insert_rowid();

  for topic_id in &req.topic_ids {
    conn.execute(
      "INSERT OR IGNORE INTO problem_topics (problem_id, topic_id) VALUES (?1, ?2)",
      params![problem_id, topic_id],
    )?;
  }
  for pattern_id in &req.pattern_ids {
    conn.execute(
      "INSERT OR IGNORE INTO problem_patterns (problem_id, pattern_id) VALUES (?1, ?2)",
      params![problem_id, pattern_id],
    )?;
  }

  Ok(problem_id)
}

pub fn get_by_id_and_user(conn: &Connection, id: i64, user_id: i64) -> Result<Option<Problem>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, user_id, external_id, title, url, difficulty, status, created_at, updated_at
    FROM problems WHERE id = ?1 AND user_id = ?2
    "#,
  )?;

  let mut rows = stmt.query(params![id, user_id])?;
  if let Some(row) = rows.next()? {
    let mut problem = row_to_problem(row)?;
    load_links(conn, &mut problem)?;
    Ok(Some(problem))
  } else {
    Ok(None)
  }
}

pub fn find_all_by_user(conn: &Connection, user_id: i64) -> Result<Vec<Problem>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, user_id, external_id, title, url, difficulty, status, created_at, updated_at
    FROM problems WHERE user_id = ?1 ORDER BY id
    "#,
  )?;

  let mut problems = stmt
    .query_map(params![user_id], row_to_problem)?
    .collect::<Result<Vec<_>>>()?;
  for problem in &mut problems {
    load_links(conn, problem)?;
  }
  Ok(problems)
}

/// Update status, bumping updated_at so solve-date fallback stays meaningful
pub fn set_status(
  conn: &Connection,
  problem_id: i64,
  status: ProblemStatus,
  now: DateTime<Utc>,
) -> Result<()> {
  conn.execute(
    "UPDATE problems SET status = ?1, updated_at = ?2 WHERE id = ?3",
    params![status.as_str(), now.to_rfc3339(), problem_id],
  )?;
  Ok(())
}

pub fn count_distinct_topics(conn: &Connection, user_id: i64) -> Result<i64> {
  conn.query_row(
    r#"
    SELECT COUNT(DISTINCT pt.topic_id)
    FROM problem_topics pt JOIN problems p ON pt.problem_id = p.id
    WHERE p.user_id = ?1
    "#,
    params![user_id],
    |row| row.get(0),
  )
}

pub fn count_distinct_patterns(conn: &Connection, user_id: i64) -> Result<i64> {
  conn.query_row(
    r#"
    SELECT COUNT(DISTINCT pp.pattern_id)
    FROM problem_patterns pp JOIN problems p ON pp.problem_id = p.id
    WHERE p.user_id = ?1
    "#,
    params![user_id],
    |row| row.get(0),
  )
}

fn load_links(conn: &Connection, problem: &mut Problem) -> Result<()> {
  let mut stmt =
    conn.prepare("SELECT topic_id FROM problem_topics WHERE problem_id = ?1 ORDER BY topic_id")?;
  problem.topic_ids = stmt
    .query_map(params![problem.id], |row| row.get(0))?
    .collect::<Result<Vec<_>>>()?;

  let mut stmt = conn
    .prepare("SELECT pattern_id FROM problem_patterns WHERE problem_id = ?1 ORDER BY pattern_id")?;
  problem.pattern_ids = stmt
    .query_map(params![problem.id], |row| row.get(0))?
    .collect::<Result<Vec<_>>>()?;
  Ok(())
}

fn row_to_problem(row: &rusqlite::Row) -> Result<Problem> {
  let difficulty_str: String = row.get(5)?;
  let status_str: String = row.get(6)?;
  let created_str: String = row.get(7)?;
  let updated_str: String = row.get(8)?;

  Ok(Problem {
    id: row.get(0)?,
    user_id: row.get(1)?,
    external_id: row.get(2)?,
    title: row.get(3)?,
    url: row.get(4)?,
    difficulty: Difficulty::from_str(&difficulty_str).unwrap_or(Difficulty::Medium),
    status: ProblemStatus::from_str(&status_str).unwrap_or(ProblemStatus::Unseen),
    topic_ids: Vec::new(),
    pattern_ids: Vec::new(),
    created_at: parse_timestamp(&created_str),
    updated_at: parse_timestamp(&updated_str),
  })
}

pub(crate) fn parse_timestamp(s: &str) -> DateTime<Utc> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .unwrap_or_else(|_| Utc::now())
}
