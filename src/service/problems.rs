//! Problem units of work.
//!
//! Creating a problem refreshes the distinct topic/pattern coverage counters
//! in the same transaction, so the running stats record never lags behind the
//! link tables. Manual status changes route through the stats adjustment that
//! keeps the status tallies in step.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::db;
use crate::domain::{CreateProblemRequest, Problem, ProblemStatus};
use crate::error::{Error, Result};

fn load_problem(conn: &Connection, problem_id: i64, user_id: i64) -> Result<Problem> {
  db::problems::get_by_id_and_user(conn, problem_id, user_id)?
    .ok_or_else(|| Error::NotFound(format!("Problem {}", problem_id)))
}

pub fn create_problem(
  conn: &mut Connection,
  user_id: i64,
  req: &CreateProblemRequest,
  now: DateTime<Utc>,
) -> Result<Problem> {
  if req.title.trim().is_empty() {
    return Err(Error::Validation("title must not be empty".to_string()));
  }

  let tx = conn.transaction().map_err(Error::Db)?;

  db::users::get_by_id(&tx, user_id)?
    .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;
  let problem_id = db::problems::insert_problem(&tx, user_id, req, now)?;
  refresh_coverage(&tx, user_id)?;

  let problem = load_problem(&tx, problem_id, user_id)?;
  tx.commit().map_err(Error::Db)?;
  Ok(problem)
}

pub fn get_problem(conn: &Connection, problem_id: i64, user_id: i64) -> Result<Problem> {
  load_problem(conn, problem_id, user_id)
}

pub fn find_all(conn: &Connection, user_id: i64) -> Result<Vec<Problem>> {
  Ok(db::problems::find_all_by_user(conn, user_id)?)
}

/// Set a problem's status by hand, e.g. marking it MASTERED after review.
pub fn override_status(
  conn: &mut Connection,
  user_id: i64,
  problem_id: i64,
  status: ProblemStatus,
  now: DateTime<Utc>,
) -> Result<Problem> {
  let tx = conn.transaction().map_err(Error::Db)?;

  let problem = load_problem(&tx, problem_id, user_id)?;
  crate::stats::adjust_on_status_override(&tx, user_id, &problem, status)?;
  db::problems::set_status(&tx, problem_id, status, now)?;

  let updated = load_problem(&tx, problem_id, user_id)?;
  tx.commit().map_err(Error::Db)?;
  Ok(updated)
}

fn refresh_coverage(conn: &Connection, user_id: i64) -> Result<()> {
  let mut stats = db::stats::get_by_user(conn, user_id)?
    .ok_or_else(|| Error::NotFound(format!("UserStats for user {}", user_id)))?;
  stats.distinct_topics_covered = db::problems::count_distinct_topics(conn, user_id)?;
  stats.distinct_patterns_covered = db::problems::count_distinct_patterns(conn, user_id)?;
  db::stats::save(conn, &stats)?;
  Ok(())
}
