use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
  Accepted,
  WrongAnswer,
  TimeLimitExceeded,
  MemoryLimitExceeded,
  RuntimeError,
  NotCompleted,
}

impl Outcome {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "ACCEPTED" => Some(Self::Accepted),
      "WRONG_ANSWER" => Some(Self::WrongAnswer),
      "TIME_LIMIT_EXCEEDED" => Some(Self::TimeLimitExceeded),
      "MEMORY_LIMIT_EXCEEDED" => Some(Self::MemoryLimitExceeded),
      "RUNTIME_ERROR" => Some(Self::RuntimeError),
      "NOT_COMPLETED" => Some(Self::NotCompleted),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Accepted => "ACCEPTED",
      Self::WrongAnswer => "WRONG_ANSWER",
      Self::TimeLimitExceeded => "TIME_LIMIT_EXCEEDED",
      Self::MemoryLimitExceeded => "MEMORY_LIMIT_EXCEEDED",
      Self::RuntimeError => "RUNTIME_ERROR",
      Self::NotCompleted => "NOT_COMPLETED",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
  Java,
  Python,
  Javascript,
  Typescript,
  Cpp,
  C,
  Go,
  Rust,
  Kotlin,
  Swift,
}

impl Language {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "JAVA" => Some(Self::Java),
      "PYTHON" => Some(Self::Python),
      "JAVASCRIPT" => Some(Self::Javascript),
      "TYPESCRIPT" => Some(Self::Typescript),
      "CPP" => Some(Self::Cpp),
      "C" => Some(Self::C),
      "GO" => Some(Self::Go),
      "RUST" => Some(Self::Rust),
      "KOTLIN" => Some(Self::Kotlin),
      "SWIFT" => Some(Self::Swift),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Java => "JAVA",
      Self::Python => "PYTHON",
      Self::Javascript => "JAVASCRIPT",
      Self::Typescript => "TYPESCRIPT",
      Self::Cpp => "CPP",
      Self::C => "C",
      Self::Go => "GO",
      Self::Rust => "RUST",
      Self::Kotlin => "KOTLIN",
      Self::Swift => "SWIFT",
    }
  }
}

/// Self-tagged error categories, a closed set. Ordered so they can key the
/// breakdown map deterministically.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mistake {
  WrongPattern,
  OffByOne,
  MissedEdgeCase,
  ForgotBaseCase,
  WrongDataStructure,
  Overcomplicated,
  Timeout,
  Overflow,
  WrongInitialization,
  IncorrectLogic,
}

impl Mistake {
  pub const ALL: [Mistake; 10] = [
    Self::WrongPattern,
    Self::OffByOne,
    Self::MissedEdgeCase,
    Self::ForgotBaseCase,
    Self::WrongDataStructure,
    Self::Overcomplicated,
    Self::Timeout,
    Self::Overflow,
    Self::WrongInitialization,
    Self::IncorrectLogic,
  ];

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "WRONG_PATTERN" => Some(Self::WrongPattern),
      "OFF_BY_ONE" => Some(Self::OffByOne),
      "MISSED_EDGE_CASE" => Some(Self::MissedEdgeCase),
      "FORGOT_BASE_CASE" => Some(Self::ForgotBaseCase),
      "WRONG_DATA_STRUCTURE" => Some(Self::WrongDataStructure),
      "OVERCOMPLICATED" => Some(Self::Overcomplicated),
      "TIMEOUT" => Some(Self::Timeout),
      "OVERFLOW" => Some(Self::Overflow),
      "WRONG_INITIALIZATION" => Some(Self::WrongInitialization),
      "INCORRECT_LOGIC" => Some(Self::IncorrectLogic),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::WrongPattern => "WRONG_PATTERN",
      Self::OffByOne => "OFF_BY_ONE",
      Self::MissedEdgeCase => "MISSED_EDGE_CASE",
      Self::ForgotBaseCase => "FORGOT_BASE_CASE",
      Self::WrongDataStructure => "WRONG_DATA_STRUCTURE",
      Self::Overcomplicated => "OVERCOMPLICATED",
      Self::Timeout => "TIMEOUT",
      Self::Overflow => "OVERFLOW",
      Self::WrongInitialization => "WRONG_INITIALIZATION",
      Self::IncorrectLogic => "INCORRECT_LOGIC",
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
  pub id: i64,
  pub problem_id: i64,
  #[serde(skip_serializing)]
  pub user_id: i64,
  /// 1-based per (user, problem), assigned at creation and never reassigned
  pub attempt_number: i64,
  pub language: Language,
  pub code: Option<String>,
  pub outcome: Outcome,
  pub duration_minutes: Option<i64>,
  pub mistakes: Vec<Mistake>,
  /// Self-reported big-O notes, stored verbatim and never aggregated
  pub time_complexity: Option<String>,
  pub space_complexity: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Body of both "log attempt" and "update attempt".
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAttemptRequest {
  pub language: Language,
  #[serde(default)]
  pub code: Option<String>,
  pub outcome: Outcome,
  #[serde(default)]
  pub duration_minutes: Option<i64>,
  #[serde(default)]
  pub mistakes: Vec<Mistake>,
  #[serde(default)]
  pub time_complexity: Option<String>,
  #[serde(default)]
  pub space_complexity: Option<String>,
}
