pub mod attempts;
pub mod problems;
pub mod stats;
pub mod users;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::error::Error;
use crate::state::AppState;

/// Caller identity, taken from the X-User-Id header. There is no
/// authentication layer in front of this; every record lookup is still
/// scoped to the id, so a wrong id only ever yields 404s.
pub struct UserId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for UserId {
  type Rejection = Error;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let value = parts
      .headers
      .get("x-user-id")
      .ok_or_else(|| Error::Validation("Missing X-User-Id header".to_string()))?;
    value
      .to_str()
      .ok()
      .and_then(|s| s.parse::<i64>().ok())
      .map(UserId)
      .ok_or_else(|| Error::Validation("Invalid X-User-Id header".to_string()))
  }
}

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/users", post(users::create))
    .route("/api/problems", post(problems::create).get(problems::list))
    .route("/api/problems/{id}", get(problems::get_one))
    .route("/api/problems/{id}/status", patch(problems::override_status))
    .route(
      "/api/problems/{id}/attempts",
      post(attempts::log).get(attempts::list),
    )
    .route(
      "/api/problems/{id}/attempts/{attempt_id}",
      get(attempts::get_one)
        .put(attempts::update)
        .delete(attempts::remove),
    )
    .route("/api/me/stats", get(stats::overview))
    .route("/api/me/stats/daily", get(stats::daily))
    .route("/api/me/stats/recompute", post(stats::recompute))
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;
  use axum_test::TestServer;
  use serde_json::{json, Value};

  fn server() -> (TestServer, tempfile::TempDir) {
    let env = TestEnv::new().unwrap();
    let (pool, data_dir) = env.into_pool();
    let state = AppState::new(pool);
    (TestServer::new(router(state)).unwrap(), data_dir)
  }

  async fn seed_user(server: &TestServer, username: &str) -> i64 {
    let response = server
      .post("/api/users")
      .json(&json!({ "username": username }))
      .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
  }

  async fn seed_problem(server: &TestServer, user_id: i64) -> i64 {
    let response = server
      .post("/api/problems")
      .add_header("x-user-id", user_id.to_string())
      .json(&json!({
        "externalId": 1,
        "title": "Two Sum",
        "url": "https://example.com/two-sum",
        "difficulty": "EASY",
        "topicIds": [3],
      }))
      .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
  }

  #[tokio::test]
  async fn test_missing_user_header_is_rejected() {
    let (server, _data_dir) = server();
    let response = server.get("/api/me/stats").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn test_attempt_lifecycle_over_http() {
    let (server, _data_dir) = server();
    let user = seed_user(&server, "alice").await;
    let problem = seed_problem(&server, user).await;

    let response = server
      .post(&format!("/api/problems/{}/attempts", problem))
      .add_header("x-user-id", user.to_string())
      .json(&json!({
        "language": "RUST",
        "outcome": "ACCEPTED",
        "durationMinutes": 25,
        "timeComplexity": "O(n log n)",
      }))
      .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let attempt = response.json::<Value>();
    assert_eq!(attempt["attemptNumber"], 1);
    assert_eq!(attempt["outcome"], "ACCEPTED");
    assert_eq!(attempt["timeComplexity"], "O(n log n)");
    let attempt_id = attempt["id"].as_i64().unwrap();

    let stats = server
      .get("/api/me/stats")
      .add_header("x-user-id", user.to_string())
      .await
      .json::<Value>();
    assert_eq!(stats["totalSolved"], 1);
    assert_eq!(stats["firstAttemptSolves"], 1);

    let response = server
      .delete(&format!("/api/problems/{}/attempts/{}", problem, attempt_id))
      .add_header("x-user-id", user.to_string())
      .await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let problem_json = server
      .get(&format!("/api/problems/{}", problem))
      .add_header("x-user-id", user.to_string())
      .await
      .json::<Value>();
    assert_eq!(problem_json["status"], "UNSEEN");
  }

  #[tokio::test]
  async fn test_attempt_not_reachable_through_wrong_problem() {
    let (server, _data_dir) = server();
    let user = seed_user(&server, "alice").await;
    let problem = seed_problem(&server, user).await;

    let other = server
      .post("/api/problems")
      .add_header("x-user-id", user.to_string())
      .json(&json!({
        "externalId": 2,
        "title": "Three Sum",
        "url": "https://example.com/three-sum",
        "difficulty": "MEDIUM",
      }))
      .await
      .json::<Value>()["id"]
      .as_i64()
      .unwrap();

    let attempt_id = server
      .post(&format!("/api/problems/{}/attempts", problem))
      .add_header("x-user-id", user.to_string())
      .json(&json!({ "language": "GO", "outcome": "WRONG_ANSWER" }))
      .await
      .json::<Value>()["id"]
      .as_i64()
      .unwrap();

    let response = server
      .get(&format!("/api/problems/{}/attempts/{}", other, attempt_id))
      .add_header("x-user-id", user.to_string())
      .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn test_foreign_users_records_look_absent() {
    let (server, _data_dir) = server();
    let alice = seed_user(&server, "alice").await;
    let bob = seed_user(&server, "bob").await;
    let problem = seed_problem(&server, alice).await;

    let response = server
      .get(&format!("/api/problems/{}", problem))
      .add_header("x-user-id", bob.to_string())
      .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn test_daily_range_requires_valid_window() {
    let (server, _data_dir) = server();
    let user = seed_user(&server, "alice").await;

    let response = server
      .get("/api/me/stats/daily")
      .add_query_param("from", "2026-03-14")
      .add_query_param("to", "2026-03-10")
      .add_header("x-user-id", user.to_string())
      .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn test_daily_endpoint_serves_stored_buckets() {
    let (server, _data_dir) = server();
    let user = seed_user(&server, "alice").await;
    let problem = seed_problem(&server, user).await;

    server
      .post(&format!("/api/problems/{}/attempts", problem))
      .add_header("x-user-id", user.to_string())
      .json(&json!({ "language": "RUST", "outcome": "ACCEPTED", "durationMinutes": 30 }))
      .await;

    let today = chrono::Utc::now().date_naive().to_string();
    let buckets = server
      .get("/api/me/stats/daily")
      .add_query_param("from", &today)
      .add_query_param("to", &today)
      .add_header("x-user-id", user.to_string())
      .await
      .json::<Value>();
    assert_eq!(buckets.as_array().unwrap().len(), 1);
    assert_eq!(buckets[0]["solved"], 1);
    assert_eq!(buckets[0]["attempted"], 1);
    assert_eq!(buckets[0]["timeMinutes"], 30);
  }

  #[tokio::test]
  async fn test_recompute_endpoint_returns_rebuilt_stats() {
    let (server, _data_dir) = server();
    let user = seed_user(&server, "alice").await;
    let problem = seed_problem(&server, user).await;

    server
      .post(&format!("/api/problems/{}/attempts", problem))
      .add_header("x-user-id", user.to_string())
      .json(&json!({ "language": "PYTHON", "outcome": "ACCEPTED", "durationMinutes": 10 }))
      .await;

    let recomputed = server
      .post("/api/me/stats/recompute")
      .add_header("x-user-id", user.to_string())
      .await
      .json::<Value>();
    assert_eq!(recomputed["totalSolved"], 1);
    assert_eq!(recomputed["easySolved"], 1);
    assert_eq!(recomputed["distinctTopicsCovered"], 1);
  }
}
