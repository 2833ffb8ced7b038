//! Handlers for the three generation routes.
//!
//! Category fields arrive as plain strings and are validated against
//! their closed sets here — an unknown tone or engagement target is a
//! 400, unlike provider output where unknown values degrade silently.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use voxprint_core::{
  draft::{Draft, Engagement, ReplyIntent, ReplyTone},
  persona::Level,
  store::PersonaStore,
};
use voxprint_engine::generator::{
  ReplySpec, ThreadSpec, TweetSpec, generate_replies, generate_thread,
  generate_tweets,
};
use voxprint_llm::{ProviderRole, build_provider};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
  pub generation_ids: Vec<Uuid>,
}

fn ids(drafts: &[Draft]) -> GenerateResponse {
  GenerateResponse {
    generation_ids: drafts.iter().map(|d| d.id).collect(),
  }
}

fn parse_spice(value: Option<&str>) -> Result<Level, ApiError> {
  match value {
    None => Ok(Level::Medium),
    Some(s) => Level::parse(s).ok_or_else(|| {
      ApiError::BadRequest(format!(
        "invalid spice level {s:?}; expected low, medium, or high"
      ))
    }),
  }
}

// ─── Tweets ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TweetRequest {
  pub topic:             String,
  #[serde(default = "default_tweet_count")]
  pub n:                 usize,
  pub spice:             Option<String>,
  #[serde(default)]
  pub use_examples:      bool,
  #[serde(default)]
  pub min_chars:         u32,
  #[serde(default = "default_max_chars")]
  pub max_chars:         u32,
  pub target_engagement: Option<String>,
}

fn default_tweet_count() -> usize { 5 }
fn default_max_chars() -> u32 { 280 }

/// `POST /generate/tweets`
pub async fn tweets<S>(
  State(state): State<ApiState<S>>,
  Json(request): Json<TweetRequest>,
) -> Result<Json<GenerateResponse>, ApiError>
where
  S: PersonaStore,
{
  let target_engagement = match request.target_engagement.as_deref() {
    None => Engagement::Reply,
    Some(s) => Engagement::parse(s).ok_or_else(|| {
      ApiError::BadRequest(format!(
        "invalid target_engagement {s:?}; expected reply, like, repost, or mixed"
      ))
    })?,
  };

  let spec = TweetSpec {
    topic: request.topic,
    n: request.n,
    spice: parse_spice(request.spice.as_deref())?,
    min_chars: request.min_chars,
    max_chars: request.max_chars,
    use_examples: request.use_examples,
    target_engagement,
  };

  let provider = build_provider(&state.llm, ProviderRole::Generate)?;
  let drafts =
    generate_tweets(state.store.as_ref(), &provider, spec).await?;
  Ok(Json(ids(&drafts)))
}

// ─── Thread ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ThreadRequest {
  pub topic:     String,
  #[serde(default = "default_thread_count")]
  pub tweets:    usize,
  pub spice:     Option<String>,
  /// Full drafts when set; an outline otherwise.
  #[serde(default)]
  pub draft:     bool,
  #[serde(default)]
  pub min_chars: u32,
  #[serde(default = "default_max_chars")]
  pub max_chars: u32,
}

fn default_thread_count() -> usize { 5 }

/// `POST /generate/thread`
pub async fn thread<S>(
  State(state): State<ApiState<S>>,
  Json(request): Json<ThreadRequest>,
) -> Result<Json<GenerateResponse>, ApiError>
where
  S: PersonaStore,
{
  let spec = ThreadSpec {
    topic: request.topic,
    tweet_count: request.tweets,
    spice: parse_spice(request.spice.as_deref())?,
    full_draft: request.draft,
    min_chars: request.min_chars,
    max_chars: request.max_chars,
  };

  let provider = build_provider(&state.llm, ProviderRole::Generate)?;
  let drafts =
    generate_thread(state.store.as_ref(), &provider, spec).await?;
  Ok(Json(ids(&drafts)))
}

// ─── Replies ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
  /// The post being replied to, verbatim.
  pub to:        String,
  pub tone:      Option<String>,
  #[serde(default = "default_reply_count")]
  pub n:         usize,
  #[serde(default)]
  pub min_chars: u32,
  #[serde(default = "default_max_chars")]
  pub max_chars: u32,
  pub context:   Option<String>,
  pub intent:    Option<String>,
}

fn default_reply_count() -> usize { 3 }

/// `POST /generate/replies`
pub async fn replies<S>(
  State(state): State<ApiState<S>>,
  Json(request): Json<ReplyRequest>,
) -> Result<Json<GenerateResponse>, ApiError>
where
  S: PersonaStore,
{
  let tone = match request.tone.as_deref() {
    None => ReplyTone::Neutral,
    Some(s) => ReplyTone::parse(s).ok_or_else(|| {
      ApiError::BadRequest(format!(
        "invalid tone {s:?}; expected one of: {}",
        ReplyTone::ALL.join(", ")
      ))
    })?,
  };
  let intent = request
    .intent
    .as_deref()
    .map(|s| {
      ReplyIntent::parse(s).ok_or_else(|| {
        ApiError::BadRequest(format!("invalid reply intent {s:?}"))
      })
    })
    .transpose()?;

  let spec = ReplySpec {
    to_text: request.to,
    tone,
    n: request.n,
    min_chars: request.min_chars,
    max_chars: request.max_chars,
    context: request.context,
    intent,
  };

  let provider = build_provider(&state.llm, ProviderRole::Generate)?;
  let drafts =
    generate_replies(state.store.as_ref(), &provider, spec).await?;
  Ok(Json(ids(&drafts)))
}
