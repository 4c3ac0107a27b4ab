use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use super::UserId;
use crate::db;
use crate::domain::{CreateProblemRequest, Problem, ProblemStatus};
use crate::error::Result;
use crate::service::problems as service;
use crate::state::AppState;

pub async fn create(
  State(state): State<AppState>,
  UserId(user_id): UserId,
  Json(req): Json<CreateProblemRequest>,
) -> Result<(StatusCode, Json<Problem>)> {
  let mut conn = db::try_lock(&state.pool)?;
  let problem = service::create_problem(&mut conn, user_id, &req, Utc::now())?;
  Ok((StatusCode::CREATED, Json(problem)))
}

pub async fn list(
  State(state): State<AppState>,
  UserId(user_id): UserId,
) -> Result<Json<Vec<Problem>>> {
  let conn = db::try_lock(&state.pool)?;
  Ok(Json(service::find_all(&conn, user_id)?))
}

pub async fn get_one(
  State(state): State<AppState>,
  UserId(user_id): UserId,
  Path(id): Path<i64>,
) -> Result<Json<Problem>> {
  let conn = db::try_lock(&state.pool)?;
  Ok(Json(service::get_problem(&conn, id, user_id)?))
}

#[derive(Deserialize)]
pub struct StatusOverrideRequest {
  pub status: ProblemStatus,
}

pub async fn override_status(
  State(state): State<AppState>,
  UserId(user_id): UserId,
  Path(id): Path<i64>,
  Json(req): Json<StatusOverrideRequest>,
) -> Result<Json<Problem>> {
  let mut conn = db::try_lock(&state.pool)?;
  let problem = service::override_status(&mut conn, user_id, id, req.status, Utc::now())?;
  Ok(Json(problem))
}
