use chrono::NaiveDate;
use serde::Serialize;

use crate::stats::mistakes::MistakeBreakdown;

/// Running aggregate counters, one row per user. Created alongside the user
/// and never lazily materialized; every counter stays non-negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
  #[serde(skip_serializing)]
  pub user_id: i64,
  pub total_solved: i64,
  pub total_solved_with_help: i64,
  pub total_mastered: i64,
  pub total_attempted: i64,
  pub easy_solved: i64,
  pub medium_solved: i64,
  pub hard_solved: i64,
  pub total_attempts: i64,
  pub first_attempt_solves: i64,
  pub total_time_minutes: i64,
  pub current_streak: i64,
  pub longest_streak: i64,
  pub last_solved_date: Option<NaiveDate>,
  pub solved_this_week: i64,
  pub solved_this_month: i64,
  pub distinct_topics_covered: i64,
  pub distinct_patterns_covered: i64,
  pub mistake_breakdown: MistakeBreakdown,
}

impl UserStats {
  pub fn new(user_id: i64) -> Self {
    Self {
      user_id,
      total_solved: 0,
      total_solved_with_help: 0,
      total_mastered: 0,
      total_attempted: 0,
      easy_solved: 0,
      medium_solved: 0,
      hard_solved: 0,
      total_attempts: 0,
      first_attempt_solves: 0,
      total_time_minutes: 0,
      current_streak: 0,
      longest_streak: 0,
      last_solved_date: None,
      solved_this_week: 0,
      solved_this_month: 0,
      distinct_topics_covered: 0,
      distinct_patterns_covered: 0,
      mistake_breakdown: MistakeBreakdown::default(),
    }
  }
}

/// Per-user, per-calendar-day activity rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
  #[serde(skip_serializing)]
  pub user_id: i64,
  pub date: NaiveDate,
  pub solved: i64,
  pub attempted: i64,
  pub time_minutes: i64,
}

impl DailyStat {
  pub fn new(user_id: i64, date: NaiveDate) -> Self {
    Self {
      user_id,
      date,
      solved: 0,
      attempted: 0,
      time_minutes: 0,
    }
  }
}
