//! Statistics aggregation engine.
//!
//! Two update strategies over the same UserStats record:
//!
//! - the incremental path applies per-attempt deltas inside the unit of work
//!   mutating the attempt (`update_on_attempt` / `adjust_on_attempt_update` /
//!   `adjust_on_attempt_delete`);
//! - `recompute` rebuilds every counter from the raw problem/attempt records
//!   and is authoritative when the two disagree (backdated attempt dates,
//!   manual status overrides).
//!
//! The steady-state read path is `get_by_user`, which serves the running
//! record with only the rolling week/month windows refreshed from the daily
//! buckets.

pub mod daily;
pub mod mistakes;
pub mod streaks;

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate};
use rusqlite::Connection;

use crate::db;
use crate::domain::{Attempt, DailyStat, Difficulty, LogAttemptRequest, Outcome, Problem, UserStats};
use crate::error::{Error, Result};
use crate::stats::mistakes::MistakeBreakdown;

fn load_stats(conn: &Connection, user_id: i64) -> Result<UserStats> {
    db::stats::get_by_user(conn, user_id)?
        .ok_or_else(|| Error::NotFound(format!("UserStats for user {}", user_id)))
}

/// Apply a freshly logged attempt. `problem` is the row as loaded at the
/// start of the unit of work, before any status transition.
pub fn update_on_attempt(
    conn: &Connection,
    user_id: i64,
    problem: &Problem,
    attempt: &Attempt,
    is_first_solve: bool,
    today: NaiveDate,
) -> Result<()> {
    let mut stats = load_stats(conn, user_id)?;

    stats.total_attempts += 1;
    if let Some(minutes) = attempt.duration_minutes {
        stats.total_time_minutes += minutes;
    }
    if problem.status == crate::domain::ProblemStatus::Unseen {
        stats.total_attempted += 1;
    }

    if is_first_solve {
        stats.total_solved += 1;
        if attempt.attempt_number == 1 {
            stats.first_attempt_solves += 1;
        }
        bump_difficulty(&mut stats, problem.difficulty, 1);
        streaks::advance(&mut stats, today);
    }

    stats.mistake_breakdown.apply(&attempt.mistakes, 1);
    db::stats::save(conn, &stats)?;

    daily::upsert(
        conn,
        user_id,
        attempt.created_at.date_naive(),
        attempt.duration_minutes,
        is_first_solve,
        1,
    )?;
    Ok(())
}

/// Reverse a deleted attempt's contribution. Called while the attempt row
/// still exists; returns whether it was the problem's only accepted attempt
/// so the caller can revert the problem status in the same unit of work.
pub fn adjust_on_attempt_delete(
    conn: &Connection,
    user_id: i64,
    problem: &Problem,
    attempt: &Attempt,
) -> Result<bool> {
    let mut stats = load_stats(conn, user_id)?;

    stats.total_attempts = (stats.total_attempts - 1).max(0);
    if let Some(minutes) = attempt.duration_minutes {
        stats.total_time_minutes = (stats.total_time_minutes - minutes).max(0);
    }

    let remaining = db::attempts::count_by_problem(conn, problem.id, user_id)? - 1;
    if remaining == 0 {
        stats.total_attempted = (stats.total_attempted - 1).max(0);
    }

    let was_only_accepted = attempt.outcome == Outcome::Accepted
        && !other_accepted_exists(conn, problem.id, user_id, attempt.id)?;

    if was_only_accepted {
        stats.total_solved = (stats.total_solved - 1).max(0);
        bump_difficulty(&mut stats, problem.difficulty, -1);
    }
    if attempt.outcome == Outcome::Accepted && attempt.attempt_number == 1 {
        stats.first_attempt_solves = (stats.first_attempt_solves - 1).max(0);
    }

    stats.mistake_breakdown.apply(&attempt.mistakes, -1);
    db::stats::save(conn, &stats)?;

    daily::adjust(
        conn,
        user_id,
        attempt.created_at.date_naive(),
        attempt.duration_minutes,
        was_only_accepted,
        -1,
    )?;
    Ok(was_only_accepted)
}

/// Re-point the running counters at an attempt's new field values. Returns
/// whether the edit gained or lost the problem's solved state (for the status
/// transition owned by the caller): `Some(true)` when a non-accepted attempt
/// became the only accepted one, `Some(false)` when the only accepted attempt
/// stopped being accepted.
pub fn adjust_on_attempt_update(
    conn: &Connection,
    user_id: i64,
    problem: &Problem,
    old: &Attempt,
    req: &LogAttemptRequest,
) -> Result<Option<bool>> {
    let mut stats = load_stats(conn, user_id)?;

    let old_duration = old.duration_minutes.unwrap_or(0);
    let new_duration = req.duration_minutes.unwrap_or(0);
    stats.total_time_minutes = (stats.total_time_minutes + new_duration - old_duration).max(0);

    stats.mistake_breakdown.apply(&old.mistakes, -1);
    stats.mistake_breakdown.apply(&req.mistakes, 1);

    let old_accepted = old.outcome == Outcome::Accepted;
    let new_accepted = req.outcome == Outcome::Accepted;
    let accepted_elsewhere = other_accepted_exists(conn, problem.id, user_id, old.id)?;

    let mut solve_flip = None;
    if old_accepted && !new_accepted {
        if !accepted_elsewhere {
            stats.total_solved = (stats.total_solved - 1).max(0);
            bump_difficulty(&mut stats, problem.difficulty, -1);
            solve_flip = Some(false);
        }
        if old.attempt_number == 1 {
            stats.first_attempt_solves = (stats.first_attempt_solves - 1).max(0);
        }
    } else if !old_accepted && new_accepted {
        if !accepted_elsewhere {
            stats.total_solved += 1;
            bump_difficulty(&mut stats, problem.difficulty, 1);
            solve_flip = Some(true);
        }
        if old.attempt_number == 1 {
            stats.first_attempt_solves += 1;
        }
    }

    db::stats::save(conn, &stats)?;

    let attempt_date = old.created_at.date_naive();
    daily::adjust_time(conn, user_id, attempt_date, new_duration - old_duration)?;
    match solve_flip {
        Some(false) => daily::adjust(conn, user_id, attempt_date, None, true, 0)?,
        Some(true) => daily::upsert(conn, user_id, attempt_date, None, true, 0)?,
        None => {}
    }
    Ok(solve_flip)
}

/// Move the status tallies when a problem's status is set by hand rather
/// than by an attempt. Streak fields are left for `recompute`; an override
/// carries no date to anchor them on.
pub fn adjust_on_status_override(
    conn: &Connection,
    user_id: i64,
    problem: &Problem,
    new_status: crate::domain::ProblemStatus,
) -> Result<()> {
    use crate::domain::ProblemStatus::*;
    let old_status = problem.status;
    if old_status == new_status {
        return Ok(());
    }
    let mut stats = load_stats(conn, user_id)?;

    if old_status == Unseen {
        stats.total_attempted += 1;
    } else if new_status == Unseen {
        stats.total_attempted = (stats.total_attempted - 1).max(0);
    }

    for (status, delta) in [(old_status, -1), (new_status, 1)] {
        let counter = match status {
            Solved => &mut stats.total_solved,
            SolvedWithHelp => &mut stats.total_solved_with_help,
            Mastered => &mut stats.total_mastered,
            _ => continue,
        };
        *counter = (*counter + delta).max(0);
    }

    if old_status.is_solved() != new_status.is_solved() {
        let delta = if new_status.is_solved() { 1 } else { -1 };
        bump_difficulty(&mut stats, problem.difficulty, delta);
    }

    db::stats::save(conn, &stats)?;
    Ok(())
}

/// Steady-state read: the running record with the rolling windows refreshed
/// from the daily buckets.
pub fn get_by_user(conn: &Connection, user_id: i64, today: NaiveDate) -> Result<UserStats> {
    let mut stats = load_stats(conn, user_id)?;
    stats.solved_this_week = db::daily::sum_solved_since(conn, user_id, start_of_week(today))?;
    stats.solved_this_month = db::daily::sum_solved_since(conn, user_id, start_of_month(today))?;
    Ok(stats)
}

/// Rebuild every counter and the daily buckets from the raw records and
/// persist the results.
pub fn recompute(conn: &Connection, user_id: i64, today: NaiveDate) -> Result<UserStats> {
    // Fail before touching anything if the stats row is missing
    load_stats(conn, user_id)?;

    let problems = db::problems::find_all_by_user(conn, user_id)?;
    let attempts = db::attempts::find_by_user_ordered(conn, user_id)?;
    let by_problem = group_by_problem(&attempts);

    let mut stats = UserStats::new(user_id);
    stats.total_attempts = attempts.len() as i64;

    let mut breakdown = MistakeBreakdown::default();
    for attempt in &attempts {
        if let Some(minutes) = attempt.duration_minutes {
            stats.total_time_minutes += minutes;
        }
        breakdown.apply(&attempt.mistakes, 1);
    }

    let mut topic_ids = HashSet::new();
    let mut pattern_ids = HashSet::new();
    let mut solve_dates = Vec::new();

    for problem in &problems {
        topic_ids.extend(problem.topic_ids.iter().copied());
        pattern_ids.extend(problem.pattern_ids.iter().copied());

        use crate::domain::ProblemStatus::*;
        if problem.status != Unseen {
            stats.total_attempted += 1;
        }
        match problem.status {
            Solved => stats.total_solved += 1,
            SolvedWithHelp => stats.total_solved_with_help += 1,
            Mastered => stats.total_mastered += 1,
            _ => {}
        }

        let problem_attempts = by_problem.get(&problem.id).map(Vec::as_slice).unwrap_or(&[]);
        if problem.status.is_solved() {
            bump_difficulty(&mut stats, problem.difficulty, 1);
            if let Some(date) = solve_date(problem, problem_attempts) {
                solve_dates.push(date);
            }
        }

        if let Some(first) = first_accepted_attempt(problem_attempts) {
            if first.attempt_number == 1 {
                stats.first_attempt_solves += 1;
            }
        }
    }

    stats.distinct_topics_covered = topic_ids.len() as i64;
    stats.distinct_patterns_covered = pattern_ids.len() as i64;
    stats.mistake_breakdown = breakdown;
    apply_solve_windows(&mut stats, &solve_dates, today);

    db::stats::save(conn, &stats)?;

    // The buckets drift the same way the counters do (edited attempts,
    // overridden statuses), so a recompute replaces them wholesale
    db::daily::delete_by_user(conn, user_id)?;
    for bucket in get_daily_stats_between(conn, user_id, NaiveDate::MIN, NaiveDate::MAX)? {
        db::daily::save(conn, &bucket)?;
    }

    Ok(stats)
}

/// Reconstruct daily buckets over `[from, to]` from the raw records:
/// attempted/time from each attempt's creation date, solved from each
/// problem's derived solve date.
pub fn get_daily_stats_between(
    conn: &Connection,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyStat>> {
    let problems = db::problems::find_all_by_user(conn, user_id)?;
    let attempts = db::attempts::find_by_user_ordered(conn, user_id)?;
    let by_problem = group_by_problem(&attempts);

    let mut buckets: BTreeMap<NaiveDate, DailyStat> = BTreeMap::new();

    for attempt in &attempts {
        let date = attempt.created_at.date_naive();
        if date < from || date > to {
            continue;
        }
        let bucket = buckets
            .entry(date)
            .or_insert_with(|| DailyStat::new(user_id, date));
        bucket.attempted += 1;
        if let Some(minutes) = attempt.duration_minutes {
            bucket.time_minutes += minutes;
        }
    }

    for problem in &problems {
        let problem_attempts = by_problem.get(&problem.id).map(Vec::as_slice).unwrap_or(&[]);
        let Some(date) = solve_date(problem, problem_attempts) else {
            continue;
        };
        if date < from || date > to {
            continue;
        }
        buckets
            .entry(date)
            .or_insert_with(|| DailyStat::new(user_id, date))
            .solved += 1;
    }

    Ok(buckets.into_values().collect())
}

fn bump_difficulty(stats: &mut UserStats, difficulty: Difficulty, delta: i64) {
    let counter = match difficulty {
        Difficulty::Easy => &mut stats.easy_solved,
        Difficulty::Medium => &mut stats.medium_solved,
        Difficulty::Hard => &mut stats.hard_solved,
    };
    *counter = (*counter + delta).max(0);
}

fn other_accepted_exists(
    conn: &Connection,
    problem_id: i64,
    user_id: i64,
    excluding_attempt: i64,
) -> Result<bool> {
    let accepted =
        db::attempts::find_by_problem_and_outcome(conn, problem_id, user_id, Outcome::Accepted)?;
    Ok(accepted.iter().any(|a| a.id != excluding_attempt))
}

fn group_by_problem(attempts: &[Attempt]) -> HashMap<i64, Vec<&Attempt>> {
    let mut by_problem: HashMap<i64, Vec<&Attempt>> = HashMap::new();
    for attempt in attempts {
        by_problem.entry(attempt.problem_id).or_default().push(attempt);
    }
    by_problem
}

/// Earliest ACCEPTED attempt: by creation time, then by attempt number
fn first_accepted_attempt<'a>(attempts: &[&'a Attempt]) -> Option<&'a Attempt> {
    attempts
        .iter()
        .filter(|a| a.outcome == Outcome::Accepted)
        .min_by_key(|a| (a.created_at, a.attempt_number))
        .copied()
}

/// Solve date for a solved problem: date of the earliest accepted attempt,
/// falling back to the problem's last-modified date when the status was set
/// without a matching attempt (manual override).
fn solve_date(problem: &Problem, attempts: &[&Attempt]) -> Option<NaiveDate> {
    if !problem.status.is_solved() {
        return None;
    }
    match first_accepted_attempt(attempts) {
        Some(first) => Some(first.created_at.date_naive()),
        None => Some(problem.updated_at.date_naive()),
    }
}

fn apply_solve_windows(stats: &mut UserStats, solve_dates: &[NaiveDate], today: NaiveDate) {
    if solve_dates.is_empty() {
        return;
    }

    let week_start = start_of_week(today);
    let month_start = start_of_month(today);
    let unique: HashSet<NaiveDate> = solve_dates.iter().copied().collect();

    stats.solved_this_week = solve_dates.iter().filter(|d| **d >= week_start).count() as i64;
    stats.solved_this_month = solve_dates.iter().filter(|d| **d >= month_start).count() as i64;
    stats.last_solved_date = solve_dates.iter().max().copied();
    stats.longest_streak = streaks::longest_streak(&unique);
    stats.current_streak = streaks::current_streak(&unique, today);
}

fn start_of_week(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(today.weekday().num_days_from_monday() as u64))
        .unwrap_or(today)
}

fn start_of_month(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}
