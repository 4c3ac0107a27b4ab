//! Attempt units of work: log, update, delete.
//!
//! Each operation runs its persistence mutation and its statistics
//! side-effects inside one transaction, so an abort leaves neither an
//! orphaned attempt row nor a stale counter. Logging additionally holds the
//! per-(user, problem) key for the whole count-then-insert section, which is
//! what keeps attempt numbers gap-free under concurrent submission.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::db;
use crate::domain::{Attempt, LogAttemptRequest, Outcome, Problem, ProblemStatus};
use crate::error::{Error, Result};
use crate::service::locks::ProblemLocks;

fn validate(req: &LogAttemptRequest) -> Result<()> {
  if let Some(minutes) = req.duration_minutes {
    if minutes < 0 {
      return Err(Error::Validation("durationMinutes must be >= 0".to_string()));
    }
  }
  Ok(())
}

fn load_problem(conn: &Connection, problem_id: i64, user_id: i64) -> Result<Problem> {
  db::problems::get_by_id_and_user(conn, problem_id, user_id)?
    .ok_or_else(|| Error::NotFound(format!("Problem {}", problem_id)))
}

fn load_attempt(conn: &Connection, id: i64, problem_id: i64, user_id: i64) -> Result<Attempt> {
  db::attempts::get_by_id_and_problem(conn, id, problem_id, user_id)?
    .ok_or_else(|| Error::NotFound(format!("Attempt {}", id)))
}

pub fn find_by_problem(conn: &Connection, problem_id: i64, user_id: i64) -> Result<Vec<Attempt>> {
  load_problem(conn, problem_id, user_id)?;
  Ok(db::attempts::find_by_problem(conn, problem_id, user_id)?)
}

pub fn find_by_id_and_problem(
  conn: &Connection,
  id: i64,
  problem_id: i64,
  user_id: i64,
) -> Result<Attempt> {
  load_attempt(conn, id, problem_id, user_id)
}

pub fn log_attempt(
  conn: &mut Connection,
  locks: &ProblemLocks,
  user_id: i64,
  problem_id: i64,
  req: &LogAttemptRequest,
  now: DateTime<Utc>,
) -> Result<Attempt> {
  validate(req)?;

  // Serializes count-existing-attempts + insert for this (user, problem)
  let _guard = locks.acquire(user_id, problem_id)?;
  let tx = conn.transaction().map_err(Error::Db)?;

  let problem = load_problem(&tx, problem_id, user_id)?;
  let attempt_number = db::attempts::count_by_problem(&tx, problem_id, user_id)? + 1;

  let is_accepted = req.outcome == Outcome::Accepted;
  let is_first_solve = is_accepted
    && db::attempts::find_by_problem_and_outcome(&tx, problem_id, user_id, Outcome::Accepted)?
      .is_empty();

  let mut attempt = Attempt {
    id: 0,
    problem_id,
    user_id,
    attempt_number,
    language: req.language,
    code: req.code.clone(),
    outcome: req.outcome,
    duration_minutes: req.duration_minutes,
    mistakes: req.mistakes.clone(),
    time_complexity: req.time_complexity.clone(),
    space_complexity: req.space_complexity.clone(),
    created_at: now,
  };
  attempt.id = db::attempts::insert_attempt(&tx, &attempt)?;

  crate::stats::update_on_attempt(&tx, user_id, &problem, &attempt, is_first_solve, now.date_naive())?;

  if is_first_solve {
    db::problems::set_status(&tx, problem_id, ProblemStatus::Solved, now)?;
  } else if !is_accepted && problem.status == ProblemStatus::Unseen {
    db::problems::set_status(&tx, problem_id, ProblemStatus::Attempted, now)?;
  }

  tx.commit().map_err(Error::Db)?;
  Ok(attempt)
}

pub fn update_attempt(
  conn: &mut Connection,
  user_id: i64,
  problem_id: i64,
  attempt_id: i64,
  req: &LogAttemptRequest,
  now: DateTime<Utc>,
) -> Result<Attempt> {
  validate(req)?;
  let tx = conn.transaction().map_err(Error::Db)?;

  let problem = load_problem(&tx, problem_id, user_id)?;
  let old = load_attempt(&tx, attempt_id, problem_id, user_id)?;

  let solve_flip = crate::stats::adjust_on_attempt_update(&tx, user_id, &problem, &old, req)?;
  db::attempts::update_attempt(&tx, old.id, req)?;

  match solve_flip {
    Some(true) if !problem.status.is_solved() => {
      db::problems::set_status(&tx, problem_id, ProblemStatus::Solved, now)?;
    }
    Some(false) if problem.status == ProblemStatus::Solved => {
      db::problems::set_status(&tx, problem_id, ProblemStatus::Attempted, now)?;
    }
    _ => {}
  }

  let updated = load_attempt(&tx, attempt_id, problem_id, user_id)?;
  tx.commit().map_err(Error::Db)?;
  Ok(updated)
}

pub fn delete_attempt(
  conn: &mut Connection,
  user_id: i64,
  problem_id: i64,
  attempt_id: i64,
  now: DateTime<Utc>,
) -> Result<()> {
  let tx = conn.transaction().map_err(Error::Db)?;

  let problem = load_problem(&tx, problem_id, user_id)?;
  let attempt = load_attempt(&tx, attempt_id, problem_id, user_id)?;

  let was_only_accepted = crate::stats::adjust_on_attempt_delete(&tx, user_id, &problem, &attempt)?;
  let remaining = db::attempts::count_by_problem(&tx, problem_id, user_id)? - 1;
  db::attempts::delete_attempt(&tx, attempt.id)?;

  // Keep the status field consistent with what the remaining attempts imply;
  // manually overridden solved variants are left alone.
  if remaining == 0 {
    if problem.status == ProblemStatus::Attempted
      || (problem.status == ProblemStatus::Solved && was_only_accepted)
    {
      db::problems::set_status(&tx, problem_id, ProblemStatus::Unseen, now)?;
    }
  } else if was_only_accepted && problem.status == ProblemStatus::Solved {
    db::problems::set_status(&tx, problem_id, ProblemStatus::Attempted, now)?;
  }

  tx.commit().map_err(Error::Db)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{CreateProblemRequest, Difficulty, Language, Mistake};
  use crate::testing::TestEnv;
  use std::sync::Arc;

  fn problem_request(external_id: i64, difficulty: Difficulty) -> CreateProblemRequest {
    CreateProblemRequest {
      external_id,
      title: format!("Problem {}", external_id),
      url: format!("https://example.com/{}", external_id),
      difficulty,
      topic_ids: vec![],
      pattern_ids: vec![],
    }
  }

  fn attempt_request(outcome: Outcome) -> LogAttemptRequest {
    LogAttemptRequest {
      language: Language::Rust,
      code: None,
      outcome,
      duration_minutes: Some(20),
      mistakes: vec![],
      time_complexity: None,
      space_complexity: None,
    }
  }

  #[test]
  fn test_log_attempt_assigns_sequential_numbers() {
    let mut env = TestEnv::new().unwrap();
    let user = env.seed_user("alice");
    let problem = env.seed_problem(user, problem_request(1, Difficulty::Easy));
    let locks = ProblemLocks::new();

    for expected in 1..=3 {
      let attempt = log_attempt(
        &mut env.conn,
        &locks,
        user,
        problem,
        &attempt_request(Outcome::WrongAnswer),
        Utc::now(),
      )
      .unwrap();
      assert_eq!(attempt.attempt_number, expected);
    }
  }

  #[test]
  fn test_log_attempt_concurrent_numbering_is_gap_free() {
    let env = TestEnv::new().unwrap();
    let user = env.seed_user("alice");
    let problem = env.seed_problem(user, problem_request(1, Difficulty::Medium));
    let (pool, _data_dir) = env.into_pool();
    let locks = Arc::new(ProblemLocks::new());

    let mut handles = Vec::new();
    for _ in 0..8 {
      let pool = Arc::clone(&pool);
      let locks = Arc::clone(&locks);
      handles.push(std::thread::spawn(move || {
        let mut conn = crate::db::try_lock(&pool).unwrap();
        log_attempt(
          &mut conn,
          &locks,
          user,
          problem,
          &attempt_request(Outcome::WrongAnswer),
          Utc::now(),
        )
        .map(|a| a.attempt_number)
      }));
    }

    let mut numbers: Vec<i64> = handles
      .into_iter()
      .map(|h| h.join().unwrap().unwrap())
      .collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=8).collect::<Vec<_>>());
  }

  #[test]
  fn test_status_transitions_on_log() {
    let mut env = TestEnv::new().unwrap();
    let user = env.seed_user("alice");
    let problem = env.seed_problem(user, problem_request(1, Difficulty::Easy));
    let locks = ProblemLocks::new();

    log_attempt(&mut env.conn, &locks, user, problem, &attempt_request(Outcome::WrongAnswer), Utc::now())
      .unwrap();
    assert_eq!(env.problem_status(problem), ProblemStatus::Attempted);

    log_attempt(&mut env.conn, &locks, user, problem, &attempt_request(Outcome::Accepted), Utc::now())
      .unwrap();
    assert_eq!(env.problem_status(problem), ProblemStatus::Solved);

    // A later accepted attempt is not a first solve and changes nothing
    log_attempt(&mut env.conn, &locks, user, problem, &attempt_request(Outcome::Accepted), Utc::now())
      .unwrap();
    assert_eq!(env.problem_status(problem), ProblemStatus::Solved);
  }

  #[test]
  fn test_negative_duration_rejected_before_any_write() {
    let mut env = TestEnv::new().unwrap();
    let user = env.seed_user("alice");
    let problem = env.seed_problem(user, problem_request(1, Difficulty::Easy));
    let locks = ProblemLocks::new();

    let mut req = attempt_request(Outcome::Accepted);
    req.duration_minutes = Some(-5);
    let result = log_attempt(&mut env.conn, &locks, user, problem, &req, Utc::now());
    assert!(matches!(result, Err(Error::Validation(_))));

    assert_eq!(db::attempts::count_by_problem(&env.conn, problem, user).unwrap(), 0);
    let stats = db::stats::get_by_user(&env.conn, user).unwrap().unwrap();
    assert_eq!(stats.total_attempts, 0);
  }

  #[test]
  fn test_log_attempt_unknown_problem_is_not_found() {
    let mut env = TestEnv::new().unwrap();
    let user = env.seed_user("alice");
    let locks = ProblemLocks::new();

    let result = log_attempt(
      &mut env.conn,
      &locks,
      user,
      42,
      &attempt_request(Outcome::Accepted),
      Utc::now(),
    );
    assert!(matches!(result, Err(Error::NotFound(_))));
  }

  #[test]
  fn test_foreign_users_problem_is_not_found() {
    let mut env = TestEnv::new().unwrap();
    let alice = env.seed_user("alice");
    let bob = env.seed_user("bob");
    let problem = env.seed_problem(alice, problem_request(1, Difficulty::Easy));
    let locks = ProblemLocks::new();

    let result = log_attempt(
      &mut env.conn,
      &locks,
      bob,
      problem,
      &attempt_request(Outcome::Accepted),
      Utc::now(),
    );
    assert!(matches!(result, Err(Error::NotFound(_))));
  }

  #[test]
  fn test_delete_last_attempt_returns_problem_to_unseen() {
    let mut env = TestEnv::new().unwrap();
    let user = env.seed_user("alice");
    let problem = env.seed_problem(user, problem_request(1, Difficulty::Easy));
    let locks = ProblemLocks::new();

    let attempt = log_attempt(
      &mut env.conn,
      &locks,
      user,
      problem,
      &attempt_request(Outcome::WrongAnswer),
      Utc::now(),
    )
    .unwrap();
    delete_attempt(&mut env.conn, user, problem, attempt.id, Utc::now()).unwrap();

    assert_eq!(env.problem_status(problem), ProblemStatus::Unseen);
    assert_eq!(db::attempts::count_by_problem(&env.conn, problem, user).unwrap(), 0);
  }

  #[test]
  fn test_delete_only_accepted_reverts_solved_status() {
    let mut env = TestEnv::new().unwrap();
    let user = env.seed_user("alice");
    let problem = env.seed_problem(user, problem_request(1, Difficulty::Easy));
    let locks = ProblemLocks::new();

    log_attempt(&mut env.conn, &locks, user, problem, &attempt_request(Outcome::WrongAnswer), Utc::now())
      .unwrap();
    let accepted = log_attempt(
      &mut env.conn,
      &locks,
      user,
      problem,
      &attempt_request(Outcome::Accepted),
      Utc::now(),
    )
    .unwrap();
    assert_eq!(env.problem_status(problem), ProblemStatus::Solved);

    delete_attempt(&mut env.conn, user, problem, accepted.id, Utc::now()).unwrap();
    assert_eq!(env.problem_status(problem), ProblemStatus::Attempted);
  }

  #[test]
  fn test_update_flip_away_reverts_status_when_no_other_accepted() {
    let mut env = TestEnv::new().unwrap();
    let user = env.seed_user("alice");
    let problem = env.seed_problem(user, problem_request(1, Difficulty::Hard));
    let locks = ProblemLocks::new();

    let attempt = log_attempt(
      &mut env.conn,
      &locks,
      user,
      problem,
      &attempt_request(Outcome::Accepted),
      Utc::now(),
    )
    .unwrap();
    assert_eq!(env.problem_status(problem), ProblemStatus::Solved);

    let mut req = attempt_request(Outcome::WrongAnswer);
    req.mistakes = vec![Mistake::MissedEdgeCase];
    update_attempt(&mut env.conn, user, problem, attempt.id, &req, Utc::now()).unwrap();
    assert_eq!(env.problem_status(problem), ProblemStatus::Attempted);
  }
}
