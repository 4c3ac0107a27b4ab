//! DailyStat persistence: one row per (user, calendar date).

use chrono::NaiveDate;
use rusqlite::{params, Connection, Result};

use crate::domain::DailyStat;

pub fn get(conn: &Connection, user_id: i64, date: NaiveDate) -> Result<Option<DailyStat>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT user_id, date, solved, attempted, time_minutes
    FROM daily_stats WHERE user_id = ?1 AND date = ?2
    "#,
    )?;

    let mut rows = stmt.query(params![user_id, date.to_string()])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_daily_stat(row)?))
    } else {
        Ok(None)
    }
}

/// Write the row, creating it if absent. Uniqueness of (user, date) is
/// enforced by the schema index.
pub fn save(conn: &Connection, daily: &DailyStat) -> Result<()> {
    conn.execute(
        r#"
    INSERT INTO daily_stats (user_id, date, solved, attempted, time_minutes)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(user_id, date) DO UPDATE
    SET solved = ?3, attempted = ?4, time_minutes = ?5
    "#,
        params![
            daily.user_id,
            daily.date.to_string(),
            daily.solved,
            daily.attempted,
            daily.time_minutes,
        ],
    )?;
    Ok(())
}

pub fn find_between(
    conn: &Connection,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyStat>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT user_id, date, solved, attempted, time_minutes
    FROM daily_stats
    WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
    ORDER BY date ASC
    "#,
    )?;

    stmt.query_map(
        params![user_id, from.to_string(), to.to_string()],
        row_to_daily_stat,
    )?
    .collect::<Result<Vec<_>>>()
}

/// Clear a user's buckets ahead of a full rebuild
pub fn delete_by_user(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute("DELETE FROM daily_stats WHERE user_id = ?1", params![user_id])?;
    Ok(())
}

pub fn sum_solved_since(conn: &Connection, user_id: i64, from: NaiveDate) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(SUM(solved), 0) FROM daily_stats WHERE user_id = ?1 AND date >= ?2",
        params![user_id, from.to_string()],
        |row| row.get(0),
    )
}

fn row_to_daily_stat(row: &rusqlite::Row) -> Result<DailyStat> {
    let date_str: String = row.get(1)?;

    Ok(DailyStat {
        user_id: row.get(0)?,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .unwrap_or(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()),
        solved: row.get(2)?,
        attempted: row.get(3)?,
        time_minutes: row.get(4)?,
    })
}
