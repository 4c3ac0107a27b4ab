//! UserStats persistence: get-by-user and full-overwrite save.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Result};

use crate::domain::UserStats;
use crate::stats::mistakes::MistakeBreakdown;

pub fn insert_zeroed(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO user_stats (user_id, mistake_breakdown) VALUES (?1, '{}')",
        params![user_id],
    )?;
    Ok(())
}

pub fn get_by_user(conn: &Connection, user_id: i64) -> Result<Option<UserStats>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT user_id, total_solved, total_solved_with_help, total_mastered, total_attempted,
           easy_solved, medium_solved, hard_solved, total_attempts, first_attempt_solves,
           total_time_minutes, current_streak, longest_streak, last_solved_date,
           solved_this_week, solved_this_month, distinct_topics_covered,
           distinct_patterns_covered, mistake_breakdown
    FROM user_stats WHERE user_id = ?1
    "#,
    )?;

    let mut rows = stmt.query(params![user_id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_user_stats(row)?))
    } else {
        Ok(None)
    }
}

/// Full overwrite of every counter. Callers run this inside the unit of work
/// that produced the new values.
pub fn save(conn: &Connection, stats: &UserStats) -> Result<()> {
    conn.execute(
        r#"
    UPDATE user_stats
    SET total_solved = ?1, total_solved_with_help = ?2, total_mastered = ?3,
        total_attempted = ?4, easy_solved = ?5, medium_solved = ?6, hard_solved = ?7,
        total_attempts = ?8, first_attempt_solves = ?9, total_time_minutes = ?10,
        current_streak = ?11, longest_streak = ?12, last_solved_date = ?13,
        solved_this_week = ?14, solved_this_month = ?15, distinct_topics_covered = ?16,
        distinct_patterns_covered = ?17, mistake_breakdown = ?18
    WHERE user_id = ?19
    "#,
        params![
            stats.total_solved,
            stats.total_solved_with_help,
            stats.total_mastered,
            stats.total_attempted,
            stats.easy_solved,
            stats.medium_solved,
            stats.hard_solved,
            stats.total_attempts,
            stats.first_attempt_solves,
            stats.total_time_minutes,
            stats.current_streak,
            stats.longest_streak,
            stats.last_solved_date.map(|d| d.to_string()),
            stats.solved_this_week,
            stats.solved_this_month,
            stats.distinct_topics_covered,
            stats.distinct_patterns_covered,
            stats.mistake_breakdown.to_blob(),
            stats.user_id,
        ],
    )?;
    Ok(())
}

fn row_to_user_stats(row: &rusqlite::Row) -> Result<UserStats> {
    let last_solved_str: Option<String> = row.get(13)?;
    let breakdown_blob: Option<String> = row.get(18)?;

    Ok(UserStats {
        user_id: row.get(0)?,
        total_solved: row.get(1)?,
        total_solved_with_help: row.get(2)?,
        total_mastered: row.get(3)?,
        total_attempted: row.get(4)?,
        easy_solved: row.get(5)?,
        medium_solved: row.get(6)?,
        hard_solved: row.get(7)?,
        total_attempts: row.get(8)?,
        first_attempt_solves: row.get(9)?,
        total_time_minutes: row.get(10)?,
        current_streak: row.get(11)?,
        longest_streak: row.get(12)?,
        last_solved_date: last_solved_str
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        solved_this_week: row.get(14)?,
        solved_this_month: row.get(15)?,
        distinct_topics_covered: row.get(16)?,
        distinct_patterns_covered: row.get(17)?,
        mistake_breakdown: MistakeBreakdown::from_blob(breakdown_blob.as_deref()),
    })
}
