//! Handler for `POST /import/extension`.

use std::path::PathBuf;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use voxprint_core::store::PersonaStore;
use voxprint_import::import_file;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
  /// Path to a JSONL or JSON export file on the server's filesystem.
  pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
  pub imported:          u64,
  pub skipped_invalid:   u64,
  pub skipped_duplicate: u64,
  pub total:             u64,
}

/// `POST /import/extension` — import an export file into the store.
pub async fn import_extension<S>(
  State(state): State<ApiState<S>>,
  Json(request): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError>
where
  S: PersonaStore,
{
  let report = import_file(state.store.as_ref(), &request.path).await?;

  Ok(Json(ImportResponse {
    imported:          report.inserted,
    skipped_invalid:   report.skipped_invalid,
    skipped_duplicate: report.skipped_duplicate,
    total:             report.total,
  }))
}
