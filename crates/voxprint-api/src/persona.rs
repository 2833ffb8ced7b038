//! Handlers for `POST /profile` and `GET /persona`.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use voxprint_core::store::PersonaStore;
use voxprint_engine::profiler::{ProfileOptions, build_persona};
use voxprint_llm::{ProviderRole, build_provider};

use crate::{ApiState, error::ApiError};

fn default_sample() -> usize { 300 }

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProfileRequest {
  pub sample:       usize,
  pub force:        bool,
  pub bio:          Option<String>,
  pub pinned_post:  Option<String>,
  pub persona_name: Option<String>,
}

impl Default for ProfileRequest {
  fn default() -> Self {
    Self {
      sample:       default_sample(),
      force:        false,
      bio:          None,
      pinned_post:  None,
      persona_name: None,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
  pub persona_version: i64,
}

/// `POST /profile` — build (or reuse) the persona.
pub async fn build<S>(
  State(state): State<ApiState<S>>,
  Json(request): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError>
where
  S: PersonaStore,
{
  let provider = build_provider(&state.llm, ProviderRole::Profile)?;
  let persona = build_persona(
    state.store.as_ref(),
    &provider,
    ProfileOptions {
      sample_size:  request.sample,
      bio:          request.bio,
      pinned_post:  request.pinned_post,
      display_name: request.persona_name,
      force:        request.force,
    },
  )
  .await?;

  Ok(Json(ProfileResponse { persona_version: persona.version }))
}

#[derive(Debug, Serialize)]
pub struct PersonaResponse {
  pub version: i64,
  pub persona: Value,
}

/// `GET /persona` — the latest persona, 404 when none has been built.
pub async fn current<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<PersonaResponse>, ApiError>
where
  S: PersonaStore,
{
  let persona = state
    .store
    .latest_persona()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound("no voice profile has been built yet".to_string())
    })?;

  let version = persona.version;
  let persona = serde_json::to_value(persona)
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(PersonaResponse { version, persona }))
}
