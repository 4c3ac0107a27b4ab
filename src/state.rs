//! Application state passed to all handlers.

use std::sync::Arc;

use crate::db::DbPool;
use crate::service::locks::ProblemLocks;

#[derive(Clone)]
pub struct AppState {
    /// Shared database connection
    pub pool: DbPool,

    /// Per-(user, problem) write locks for attempt numbering
    pub locks: Arc<ProblemLocks>,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            locks: Arc::new(ProblemLocks::new()),
        }
    }
}
