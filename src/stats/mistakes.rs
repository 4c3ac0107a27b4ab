//! Mistake-kind frequency map, stored as a JSON blob on the stats row.
//!
//! The map is sparse: applying a delta that would drop a count to zero or
//! below removes the key. An unreadable or missing blob is an empty map,
//! never an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::db::LogOnError;
use crate::domain::Mistake;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakeBreakdown(BTreeMap<Mistake, i64>);

impl MistakeBreakdown {
    /// Deserialize from the stored blob, recovering corruption as empty
    pub fn from_blob(blob: Option<&str>) -> Self {
        match blob {
            None => Self::default(),
            Some(s) => {
                serde_json::from_str(s).log_warn_default("unreadable mistake breakdown blob")
            }
        }
    }

    pub fn to_blob(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Add `delta` to the count of each listed kind. `delta` is +1 when a
    /// new attempt's mistakes land, -1 when a deleted or replaced attempt's
    /// mistakes are reversed.
    pub fn apply(&mut self, mistakes: &[Mistake], delta: i64) {
        for mistake in mistakes {
            let new_count = self.0.get(mistake).copied().unwrap_or(0) + delta;
            if new_count <= 0 {
                self.0.remove(mistake);
            } else {
                self.0.insert(*mistake, new_count);
            }
        }
    }

    pub fn count(&self, mistake: Mistake) -> i64 {
        self.0.get(&mistake).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
