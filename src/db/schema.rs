use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      username TEXT NOT NULL UNIQUE,
      created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS problems (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id INTEGER NOT NULL,
      external_id INTEGER NOT NULL,
      title TEXT NOT NULL,
      url TEXT NOT NULL,
      difficulty TEXT NOT NULL,
      status TEXT NOT NULL DEFAULT 'UNSEEN',
      created_at TEXT NOT NULL,
      updated_at TEXT NOT NULL,
      FOREIGN KEY (user_id) REFERENCES users(id)
    );

    CREATE TABLE IF NOT EXISTS problem_topics (
      problem_id INTEGER NOT NULL,
      topic_id INTEGER NOT NULL,
      PRIMARY KEY (problem_id, topic_id),
      FOREIGN KEY (problem_id) REFERENCES problems(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS problem_patterns (
      problem_id INTEGER NOT NULL,
      pattern_id INTEGER NOT NULL,
      PRIMARY KEY (problem_id, pattern_id),
      FOREIGN KEY (problem_id) REFERENCES problems(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS attempts (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      problem_id INTEGER NOT NULL,
      user_id INTEGER NOT NULL,
      attempt_number INTEGER NOT NULL,
      language TEXT NOT NULL,
      code TEXT,
      outcome TEXT NOT NULL,
      duration_minutes INTEGER,
      mistakes TEXT NOT NULL DEFAULT '[]',
      time_complexity TEXT,
      space_complexity TEXT,
      created_at TEXT NOT NULL,
      FOREIGN KEY (problem_id) REFERENCES problems(id) ON DELETE CASCADE,
      FOREIGN KEY (user_id) REFERENCES users(id)
    );

    CREATE TABLE IF NOT EXISTS user_stats (
      user_id INTEGER PRIMARY KEY,
      total_solved INTEGER NOT NULL DEFAULT 0,
      total_solved_with_help INTEGER NOT NULL DEFAULT 0,
      total_mastered INTEGER NOT NULL DEFAULT 0,
      total_attempted INTEGER NOT NULL DEFAULT 0,
      easy_solved INTEGER NOT NULL DEFAULT 0,
      medium_solved INTEGER NOT NULL DEFAULT 0,
      hard_solved INTEGER NOT NULL DEFAULT 0,
      total_attempts INTEGER NOT NULL DEFAULT 0,
      first_attempt_solves INTEGER NOT NULL DEFAULT 0,
      total_time_minutes INTEGER NOT NULL DEFAULT 0,
      current_streak INTEGER NOT NULL DEFAULT 0,
      longest_streak INTEGER NOT NULL DEFAULT 0,
      last_solved_date TEXT,
      solved_this_week INTEGER NOT NULL DEFAULT 0,
      solved_this_month INTEGER NOT NULL DEFAULT 0,
      distinct_topics_covered INTEGER NOT NULL DEFAULT 0,
      distinct_patterns_covered INTEGER NOT NULL DEFAULT 0,
      mistake_breakdown TEXT,
      FOREIGN KEY (user_id) REFERENCES users(id)
    );

    CREATE TABLE IF NOT EXISTS daily_stats (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id INTEGER NOT NULL,
      date TEXT NOT NULL,
      solved INTEGER NOT NULL DEFAULT 0,
      attempted INTEGER NOT NULL DEFAULT 0,
      time_minutes INTEGER NOT NULL DEFAULT 0,
      FOREIGN KEY (user_id) REFERENCES users(id)
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_problems_user ON problems(user_id);
    CREATE INDEX IF NOT EXISTS idx_attempts_problem_user ON attempts(problem_id, user_id);
    CREATE INDEX IF NOT EXISTS idx_attempts_user_created ON attempts(user_id, created_at);
    CREATE UNIQUE INDEX IF NOT EXISTS idx_daily_stats_user_date ON daily_stats(user_id, date);
    "#,
  )?;

  Ok(())
}
