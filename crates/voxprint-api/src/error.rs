//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Engine(#[from] voxprint_engine::Error),

  #[error(transparent)]
  Import(#[from] voxprint_import::Error),

  #[error("provider setup failed: {0}")]
  Provider(#[from] voxprint_llm::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    use voxprint_engine::Error as EngineError;
    use voxprint_import::Error as ImportError;

    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
      // State preconditions are user-actionable, not server faults.
      ApiError::Engine(e @ (EngineError::NoPersona | EngineError::NoRecords)) => {
        (StatusCode::BAD_REQUEST, e.to_string())
      }
      ApiError::Engine(e @ EngineError::Extraction(_)) => {
        (StatusCode::BAD_GATEWAY, e.to_string())
      }
      ApiError::Engine(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
      ApiError::Import(e @ ImportError::FileNotFound(_)) => {
        (StatusCode::NOT_FOUND, e.to_string())
      }
      ApiError::Import(e @ ImportError::Store(_)) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
      // Malformed input files are validation errors, shown verbatim.
      ApiError::Import(e) => (StatusCode::BAD_REQUEST, e.to_string()),
      ApiError::Provider(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
