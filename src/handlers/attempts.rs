use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use super::UserId;
use crate::db;
use crate::domain::{Attempt, LogAttemptRequest};
use crate::error::Result;
use crate::service::attempts as service;
use crate::state::AppState;

pub async fn log(
  State(state): State<AppState>,
  UserId(user_id): UserId,
  Path(problem_id): Path<i64>,
  Json(req): Json<LogAttemptRequest>,
) -> Result<(StatusCode, Json<Attempt>)> {
  let mut conn = db::try_lock(&state.pool)?;
  let attempt = service::log_attempt(&mut conn, &state.locks, user_id, problem_id, &req, Utc::now())?;
  Ok((StatusCode::CREATED, Json(attempt)))
}

pub async fn list(
  State(state): State<AppState>,
  UserId(user_id): UserId,
  Path(problem_id): Path<i64>,
) -> Result<Json<Vec<Attempt>>> {
  let conn = db::try_lock(&state.pool)?;
  Ok(Json(service::find_by_problem(&conn, problem_id, user_id)?))
}

pub async fn get_one(
  State(state): State<AppState>,
  UserId(user_id): UserId,
  Path((problem_id, attempt_id)): Path<(i64, i64)>,
) -> Result<Json<Attempt>> {
  let conn = db::try_lock(&state.pool)?;
  Ok(Json(service::find_by_id_and_problem(
    &conn, attempt_id, problem_id, user_id,
  )?))
}

pub async fn update(
  State(state): State<AppState>,
  UserId(user_id): UserId,
  Path((problem_id, attempt_id)): Path<(i64, i64)>,
  Json(req): Json<LogAttemptRequest>,
) -> Result<Json<Attempt>> {
  let mut conn = db::try_lock(&state.pool)?;
  let attempt = service::update_attempt(&mut conn, user_id, problem_id, attempt_id, &req, Utc::now())?;
  Ok(Json(attempt))
}

pub async fn remove(
  State(state): State<AppState>,
  UserId(user_id): UserId,
  Path((problem_id, attempt_id)): Path<(i64, i64)>,
) -> Result<StatusCode> {
  let mut conn = db::try_lock(&state.pool)?;
  service::delete_attempt(&mut conn, user_id, problem_id, attempt_id, Utc::now())?;
  Ok(StatusCode::NO_CONTENT)
}
