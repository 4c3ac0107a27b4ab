//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so tests never duplicate
//! DDL, plus small seeding helpers for the rows almost every test needs.

use chrono::Utc;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::db;
use crate::domain::{CreateProblemRequest, ProblemStatus};

/// Test environment with a migrated database in a temporary directory,
/// cleaned up when dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let db_path = temp.path().join("grindtrack.db");
        let conn = Connection::open(&db_path)?;
        db::schema::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }

    /// Insert a user with a zeroed stats row, returning its id.
    pub fn seed_user(&self, username: &str) -> i64 {
        db::users::create_user(&self.conn, username, Utc::now()).unwrap()
    }

    /// Insert a problem row directly, returning its id. Bypasses the service
    /// layer so seeding never touches the coverage counters.
    pub fn seed_problem(&self, user_id: i64, req: CreateProblemRequest) -> i64 {
        db::problems::insert_problem(&self.conn, user_id, &req, Utc::now()).unwrap()
    }

    pub fn problem_status(&self, problem_id: i64) -> ProblemStatus {
        self.conn
            .query_row(
                "SELECT status FROM problems WHERE id = ?1",
                [problem_id],
                |row| row.get::<_, String>(0),
            )
            .map(|s| ProblemStatus::from_str(&s).unwrap())
            .unwrap()
    }

    /// Wrap the connection in a shared pool for tests that exercise
    /// concurrent access. The TempDir is returned alongside the pool and must
    /// outlive it; dropping it unlinks the database file out from under
    /// SQLite, which then refuses further writes.
    pub fn into_pool(self) -> (db::DbPool, TempDir) {
        (Arc::new(Mutex::new(self.conn)), self.temp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_stays_writable_after_conversion() {
        let env = TestEnv::new().unwrap();
        let (pool, _data_dir) = env.into_pool();

        let conn = db::try_lock(&pool).unwrap();
        let id = db::users::create_user(&conn, "alice", Utc::now()).unwrap();
        assert!(db::users::get_by_id(&conn, id).unwrap().is_some());
    }
}
