//! Daily bucket maintenance.
//!
//! Every counter write floor-clamps at zero, so out-of-order or partially
//! replayed reversals can never drive a bucket negative.

use chrono::NaiveDate;
use rusqlite::{Connection, Result};

use crate::db::daily;
use crate::domain::DailyStat;

/// Apply attempt activity to the day's bucket, creating the row if absent.
pub fn upsert(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
    duration_minutes: Option<i64>,
    is_solve: bool,
    attempt_delta: i64,
) -> Result<()> {
    let mut bucket =
        daily::get(conn, user_id, date)?.unwrap_or_else(|| DailyStat::new(user_id, date));

    bucket.attempted = (bucket.attempted + attempt_delta).max(0);
    if is_solve {
        bucket.solved += 1;
    }
    if let Some(minutes) = duration_minutes {
        bucket.time_minutes = (bucket.time_minutes + minutes).max(0);
    }
    daily::save(conn, &bucket)
}

/// Reverse attempt activity. Only mutates an existing row; reversing into a
/// day that has no bucket is a no-op.
pub fn adjust(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
    duration_minutes: Option<i64>,
    was_solve: bool,
    attempt_delta: i64,
) -> Result<()> {
    let Some(mut bucket) = daily::get(conn, user_id, date)? else {
        return Ok(());
    };

    bucket.attempted = (bucket.attempted + attempt_delta).max(0);
    if was_solve {
        bucket.solved = (bucket.solved - 1).max(0);
    }
    if let Some(minutes) = duration_minutes {
        bucket.time_minutes = (bucket.time_minutes - minutes).max(0);
    }
    daily::save(conn, &bucket)
}

pub fn adjust_time(conn: &Connection, user_id: i64, date: NaiveDate, time_delta: i64) -> Result<()> {
    if time_delta == 0 {
        return Ok(());
    }
    let Some(mut bucket) = daily::get(conn, user_id, date)? else {
        return Ok(());
    };

    bucket.time_minutes = (bucket.time_minutes + time_delta).max(0);
    daily::save(conn, &bucket)
}
