use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::UserId;
use crate::db;
use crate::domain::{DailyStat, UserStats};
use crate::error::{Error, Result};
use crate::state::AppState;
use crate::stats;

pub async fn overview(
  State(state): State<AppState>,
  UserId(user_id): UserId,
) -> Result<Json<UserStats>> {
  let conn = db::try_lock(&state.pool)?;
  Ok(Json(stats::get_by_user(&conn, user_id, Utc::now().date_naive())?))
}

#[derive(Deserialize)]
pub struct DailyRange {
  pub from: NaiveDate,
  pub to: NaiveDate,
}

/// Serves the stored buckets directly; `recompute` rebuilds them when they
/// have drifted from the raw records.
pub async fn daily(
  State(state): State<AppState>,
  UserId(user_id): UserId,
  Query(range): Query<DailyRange>,
) -> Result<Json<Vec<DailyStat>>> {
  if range.from > range.to {
    return Err(Error::Validation("from must not be after to".to_string()));
  }
  let conn = db::try_lock(&state.pool)?;
  Ok(Json(db::daily::find_between(
    &conn, user_id, range.from, range.to,
  )?))
}

pub async fn recompute(
  State(state): State<AppState>,
  UserId(user_id): UserId,
) -> Result<Json<UserStats>> {
  let conn = db::try_lock(&state.pool)?;
  Ok(Json(stats::recompute(&conn, user_id, Utc::now().date_naive())?))
}
