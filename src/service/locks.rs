//! Exclusive critical sections keyed by (user, problem).
//!
//! Attempt numbering reads "count existing attempts" and inserts the next
//! one; two concurrent logs for the same pair must serialize through here or
//! they would assign the same number. Acquisition is bounded: a caller that
//! cannot get the key within the configured wait gets `Error::Contention`
//! and is expected to retry. Nothing is reserved on failure.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config;
use crate::error::{Error, Result};

type Key = (i64, i64);

#[derive(Default)]
pub struct ProblemLocks {
  held: Arc<Mutex<HashSet<Key>>>,
}

impl ProblemLocks {
  pub fn new() -> Self {
    Self::default()
  }

  /// Acquire the (user, problem) key, polling up to the configured wait
  pub fn acquire(&self, user_id: i64, problem_id: i64) -> Result<ProblemGuard> {
    let key = (user_id, problem_id);
    let deadline = Instant::now() + Duration::from_millis(config::LOCK_WAIT_MS);

    loop {
      {
        let mut held = self.held.lock().map_err(|_| Error::Unavailable)?;
        if held.insert(key) {
          return Ok(ProblemGuard {
            held: Arc::clone(&self.held),
            key,
          });
        }
      }
      if Instant::now() >= deadline {
        tracing::warn!(
          "attempt numbering lock contended for user {} problem {}",
          user_id,
          problem_id
        );
        return Err(Error::Contention);
      }
      std::thread::sleep(Duration::from_millis(config::LOCK_RETRY_MS));
    }
  }
}

/// Releases the key on drop, including on panic and early return
pub struct ProblemGuard {
  held: Arc<Mutex<HashSet<Key>>>,
  key: Key,
}

impl Drop for ProblemGuard {
  fn drop(&mut self) {
    if let Ok(mut held) = self.held.lock() {
      held.remove(&self.key);
    }
  }
}
