//! JSON REST API for voxprint.
//!
//! Exposes an axum [`Router`] backed by any
//! [`voxprint_core::store::PersonaStore`]. TLS and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = ApiState::new(store, llm_settings);
//! axum::serve(listener, voxprint_api::api_router(state)).await?;
//! ```

pub mod drafts;
pub mod error;
pub mod generate;
pub mod imports;
pub mod persona;
pub mod review;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use voxprint_core::store::PersonaStore;
use voxprint_llm::LlmSettings;

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S: PersonaStore> {
  pub store: Arc<S>,
  pub llm:   Arc<LlmSettings>,
}

impl<S: PersonaStore> ApiState<S> {
  pub fn new(store: S, llm: LlmSettings) -> Self {
    Self { store: Arc::new(store), llm: Arc::new(llm) }
  }
}

// Manual impl: `S` itself need not be `Clone` behind the `Arc`s.
impl<S: PersonaStore> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), llm: Arc::clone(&self.llm) }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: PersonaStore + 'static,
{
  Router::new()
    // Import
    .route("/import/extension", post(imports::import_extension::<S>))
    // Persona
    .route("/profile", post(persona::build::<S>))
    .route("/persona", get(persona::current::<S>))
    // Generation
    .route("/generate/tweets", post(generate::tweets::<S>))
    .route("/generate/thread", post(generate::thread::<S>))
    .route("/generate/replies", post(generate::replies::<S>))
    // Review
    .route("/review", post(review::review_recent_drafts::<S>))
    .route("/suppression/check", get(review::suppression_check::<S>))
    // Drafts
    .route("/drafts", get(drafts::list::<S>))
    .route("/drafts/{id}", get(drafts::get_one::<S>))
    .route("/drafts/{id}/reviews", get(drafts::reviews::<S>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use voxprint_store_sqlite::SqliteStore;

  use super::*;

  async fn make_state() -> ApiState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    // Default settings carry no API key, so providers serve stubs and
    // the whole pipeline runs offline.
    ApiState::new(store, LlmSettings::default())
  }

  async fn seed_records(state: &ApiState<SqliteStore>, n: usize) {
    let records = (0..n)
      .map(|i| voxprint_core::record::NewRecord {
        record_id:  format!("r{i}"),
        created_at: format!("2024-02-{:02}T00:00:00Z", i % 28 + 1),
        text:       format!("seeded post {i}"),
        origin:     "extension".into(),
        ..Default::default()
      })
      .collect();
    state.store.insert_records(records).await.unwrap();
  }

  async fn request(
    state: ApiState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(value) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(value.to_string())
      }
      None => Body::empty(),
    };
    let response = api_router(state)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  #[tokio::test]
  async fn persona_is_404_until_built() {
    let state = make_state().await;
    let (status, body) = request(state, "GET", "/persona", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("error").is_some());
  }

  #[tokio::test]
  async fn profile_without_records_is_a_400() {
    let state = make_state().await;
    let (status, body) = request(
      state,
      "POST",
      "/profile",
      Some(json!({ "sample": 100, "force": false })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
      body["error"].as_str().unwrap().contains("no records"),
      "body: {body}"
    );
  }

  #[tokio::test]
  async fn profile_then_persona_roundtrip() {
    let state = make_state().await;
    seed_records(&state, 3).await;

    let (status, body) =
      request(state.clone(), "POST", "/profile", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["persona_version"], 1);

    let (status, body) = request(state, "GET", "/persona", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], 1);
    assert!(body["persona"]["voice_rules"].is_object());
  }

  #[tokio::test]
  async fn generation_without_persona_is_a_400() {
    let state = make_state().await;
    let (status, body) = request(
      state,
      "POST",
      "/generate/tweets",
      Some(json!({ "topic": "rust" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
      body["error"].as_str().unwrap().contains("profile"),
      "body: {body}"
    );
  }

  #[tokio::test]
  async fn generate_tweets_returns_generation_ids() {
    let state = make_state().await;
    seed_records(&state, 3).await;
    request(state.clone(), "POST", "/profile", Some(json!({}))).await;

    let (status, body) = request(
      state.clone(),
      "POST",
      "/generate/tweets",
      Some(json!({ "topic": "testing", "n": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    let ids = body["generation_ids"].as_array().unwrap();
    assert!(!ids.is_empty());

    // The drafts are retrievable through the drafts routes.
    let (status, body) = request(state, "GET", "/drafts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn review_scores_recent_drafts() {
    let state = make_state().await;
    seed_records(&state, 3).await;
    request(state.clone(), "POST", "/profile", Some(json!({}))).await;
    request(
      state.clone(),
      "POST",
      "/generate/tweets",
      Some(json!({ "topic": "testing" })),
    )
    .await;

    let (status, body) = request(
      state,
      "POST",
      "/review",
      Some(json!({ "last": 5, "auto_refine": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert!(body["reviewed"].as_u64().unwrap() >= 1);
  }

  #[tokio::test]
  async fn unknown_draft_is_a_404() {
    let state = make_state().await;
    let id = uuid::Uuid::new_v4();
    let (status, _) =
      request(state, "GET", &format!("/drafts/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn suppression_check_is_pure_and_instant() {
    let state = make_state().await;
    let (status, body) = request(
      state,
      "GET",
      "/suppression/check?text=anyone%20else%20love%20this%3F",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk"], "high");
    assert_eq!(body["recommendation"], "review");
  }

  #[tokio::test]
  async fn import_missing_file_is_a_404() {
    let state = make_state().await;
    let (status, body) = request(
      state,
      "POST",
      "/import/extension",
      Some(json!({ "path": "/nonexistent/export.jsonl" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "body: {body}");
  }
}
