//! Handlers for the draft read routes.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;
use voxprint_core::{draft::Draft, review::Review, store::PersonaStore};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// `GET /drafts[?limit=N]` — most recent drafts.
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Draft>>, ApiError>
where
  S: PersonaStore,
{
  let drafts = state
    .store
    .recent_drafts(params.limit.unwrap_or(10))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(drafts))
}

/// `GET /drafts/{id}` — one draft, 404 when missing.
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Draft>, ApiError>
where
  S: PersonaStore,
{
  let draft = state
    .store
    .draft_by_id(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("draft not found: {id}")))?;
  Ok(Json(draft))
}

/// `GET /drafts/{id}/reviews` — the append-only review history,
/// newest first.
pub async fn reviews<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Review>>, ApiError>
where
  S: PersonaStore,
{
  let reviews = state
    .store
    .reviews_for_draft(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(reviews))
}
