use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::db;
use crate::error::{Error, Result};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateUserRequest {
  pub username: String,
}

pub async fn create(
  State(state): State<AppState>,
  Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
  let username = req.username.trim();
  if username.is_empty() {
    return Err(Error::Validation("username must not be empty".to_string()));
  }

  let conn = db::try_lock(&state.pool)?;
  let id = db::users::create_user(&conn, username, Utc::now())?;
  Ok((
    StatusCode::CREATED,
    Json(serde_json::json!({ "id": id, "username": username })),
  ))
}
