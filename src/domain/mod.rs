pub mod attempt;
pub mod problem;
pub mod stats;

pub use attempt::{Attempt, Language, LogAttemptRequest, Mistake, Outcome};
pub use problem::{CreateProblemRequest, Difficulty, Problem, ProblemStatus};
pub use stats::{DailyStat, UserStats};
