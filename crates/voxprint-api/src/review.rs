//! Handlers for `POST /review` and `GET /suppression/check`.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use voxprint_core::{store::PersonaStore, suppress};
use voxprint_engine::reviewer::review_recent;
use voxprint_llm::{ProviderRole, build_provider};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReviewRequest {
  pub last:        usize,
  pub auto_refine: bool,
}

impl Default for ReviewRequest {
  fn default() -> Self {
    Self { last: 10, auto_refine: false }
  }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
  pub reviewed: usize,
}

/// `POST /review` — provider-score the most recent drafts.
pub async fn review_recent_drafts<S>(
  State(state): State<ApiState<S>>,
  Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError>
where
  S: PersonaStore,
{
  let provider = build_provider(&state.llm, ProviderRole::Review)?;
  let reviews = review_recent(
    state.store.as_ref(),
    &provider,
    request.last,
    request.auto_refine,
  )
  .await?;

  Ok(Json(ReviewResponse { reviewed: reviews.len() }))
}

#[derive(Debug, Deserialize)]
pub struct SuppressionParams {
  pub text: String,
}

/// `GET /suppression/check?text=...` — the deterministic classifier.
/// Pure function of the text; no provider call is made.
pub async fn suppression_check<S>(
  State(_state): State<ApiState<S>>,
  Query(params): Query<SuppressionParams>,
) -> Json<suppress::SuppressionReport>
where
  S: PersonaStore,
{
  Json(suppress::classify(&params.text))
}
