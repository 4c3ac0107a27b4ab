use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "EASY" => Some(Self::Easy),
      "MEDIUM" => Some(Self::Medium),
      "HARD" => Some(Self::Hard),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Easy => "EASY",
      Self::Medium => "MEDIUM",
      Self::Hard => "HARD",
    }
  }
}

/// Problem lifecycle. Transitions move forward (UNSEEN -> ATTEMPTED ->
/// SOLVED variants) except through an explicit manual override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemStatus {
  Unseen,
  Attempted,
  Solved,
  SolvedWithHelp,
  Mastered,
}

impl ProblemStatus {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "UNSEEN" => Some(Self::Unseen),
      "ATTEMPTED" => Some(Self::Attempted),
      "SOLVED" => Some(Self::Solved),
      "SOLVED_WITH_HELP" => Some(Self::SolvedWithHelp),
      "MASTERED" => Some(Self::Mastered),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Unseen => "UNSEEN",
      Self::Attempted => "ATTEMPTED",
      Self::Solved => "SOLVED",
      Self::SolvedWithHelp => "SOLVED_WITH_HELP",
      Self::Mastered => "MASTERED",
    }
  }

  /// True for the statuses that count toward solved totals and carry a
  /// derivable solve date.
  pub fn is_solved(&self) -> bool {
    matches!(self, Self::Solved | Self::SolvedWithHelp | Self::Mastered)
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
  pub id: i64,
  #[serde(skip_serializing)]
  pub user_id: i64,
  pub external_id: i64,
  pub title: String,
  pub url: String,
  pub difficulty: Difficulty,
  pub status: ProblemStatus,
  pub topic_ids: Vec<i64>,
  pub pattern_ids: Vec<i64>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProblemRequest {
  pub external_id: i64,
  pub title: String,
  pub url: String,
  pub difficulty: Difficulty,
  #[serde(default)]
  pub topic_ids: Vec<i64>,
  #[serde(default)]
  pub pattern_ids: Vec<i64>,
}
