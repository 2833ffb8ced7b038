//! Provider-scored draft review.
//!
//! One structured-generation call per draft scores persona alignment and
//! algorithm alignment. A failed call still yields a persisted
//! zero-score review noting the failure — the append-only history shows
//! every attempt, and callers never see a transport exception.
//!
//! The deterministic suppression-risk classifier
//! ([`voxprint_core::suppress`]) is the instant, provider-free
//! cross-check for the same concern.

use serde_json::Value;
use uuid::Uuid;
use voxprint_core::{
  draft::{Draft, DraftKind, RiskLevel},
  persona::{Level, Persona},
  review::{AlgoReview, PersonaAlgoConflict, Review},
  store::PersonaStore,
};
use voxprint_llm::{JsonRequest, LlmProvider};

use crate::{
  Error, Result, generator::require_persona,
  prompts::{self, ReviewKind},
};

const REVIEW_TEMPERATURE: f32 = 0.3;

/// Review the most recent `last_n` drafts. Every result is persisted.
pub async fn review_recent<S, P>(
  store: &S,
  provider: &P,
  last_n: usize,
  auto_refine: bool,
) -> Result<Vec<Review>>
where
  S: PersonaStore,
  P: LlmProvider,
{
  let persona = require_persona(store).await?;
  let drafts = store
    .recent_drafts(last_n)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let mut reviews = Vec::with_capacity(drafts.len());
  for draft in &drafts {
    let review = review_single(&persona, draft, provider, auto_refine).await;
    store
      .save_review(&review)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    reviews.push(review);
  }

  tracing::info!(count = reviews.len(), "drafts reviewed");
  Ok(reviews)
}

/// Review one draft by id. Returns `None` when the draft does not exist.
pub async fn review_draft<S, P>(
  store: &S,
  provider: &P,
  draft_id: Uuid,
  auto_refine: bool,
) -> Result<Option<Review>>
where
  S: PersonaStore,
  P: LlmProvider,
{
  let persona = require_persona(store).await?;
  let Some(draft) = store
    .draft_by_id(draft_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
  else {
    return Ok(None);
  };

  let review = review_single(&persona, &draft, provider, auto_refine).await;
  store
    .save_review(&review)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Some(review))
}

/// Map a draft kind onto its review rubric.
fn review_kind(kind: DraftKind) -> ReviewKind {
  match kind {
    DraftKind::Reply => ReviewKind::Reply,
    DraftKind::ThreadOutline | DraftKind::ThreadDraft => ReviewKind::Thread,
    DraftKind::Tweet => ReviewKind::Tweet,
  }
}

async fn review_single<P>(
  persona: &Persona,
  draft: &Draft,
  provider: &P,
  auto_refine: bool,
) -> Review
where
  P: LlmProvider,
{
  let prompt = prompts::review_request(
    persona,
    &draft.text.flatten(),
    review_kind(draft.kind),
    auto_refine,
  );
  let response = provider
    .generate_json(
      JsonRequest::new(prompt, serde_json::json!({ "type": "object" }))
        .with_temperature(REVIEW_TEMPERATURE),
    )
    .await;

  parse_review(&response, draft.id)
}

/// Permissive parsing of a review payload. Invalid or missing category
/// values clamp to documented defaults (repetition risk low,
/// conversation value medium); an error-tagged payload degrades to a
/// zero-score review that records the failure.
pub(crate) fn parse_review(response: &Value, draft_id: Uuid) -> Review {
  if let Some(error) = response.get("error") {
    return Review {
      id: Uuid::new_v4(),
      draft_id,
      alignment_score: 0.0,
      violations: vec![format!("review extraction failed: {error}")],
      suggestions: Vec::new(),
      revised_text: None,
      algo: None,
    };
  }

  let str_field = |key: &str| {
    response.get(key).and_then(Value::as_str).map(str::to_owned)
  };
  let list_field = |key: &str| -> Vec<String> {
    response
      .get(key)
      .and_then(Value::as_array)
      .map(|values| {
        values
          .iter()
          .filter_map(Value::as_str)
          .map(str::to_owned)
          .collect()
      })
      .unwrap_or_default()
  };

  let conflicts = response
    .get("persona_algorithm_conflicts")
    .and_then(Value::as_array)
    .map(|items| {
      items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| PersonaAlgoConflict {
          persona_rule: item
            .get("persona_rule")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
          algorithm_constraint: item
            .get("algorithm_constraint")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
          resolution: item
            .get("resolution")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        })
        .collect()
    })
    .unwrap_or_default();

  let repetition_risk = str_field("repetition_risk")
    .and_then(|s| RiskLevel::parse(&s))
    .unwrap_or(RiskLevel::Low);
  let conversation_value = str_field("conversation_value")
    .and_then(|s| Level::parse(&s))
    .unwrap_or(Level::Medium);

  Review {
    id: Uuid::new_v4(),
    draft_id,
    alignment_score: response
      .get("alignment_score")
      .and_then(Value::as_f64)
      .unwrap_or(0.0),
    violations: list_field("violations"),
    suggestions: list_field("suggestions"),
    revised_text: str_field("revised_text"),
    algo: Some(AlgoReview {
      algorithm_score: response
        .get("algorithm_alignment_score")
        .and_then(Value::as_f64),
      suppression_score: response
        .get("suppression_risk_score")
        .and_then(Value::as_f64),
      repetition_risk,
      conversation_value,
      issues: list_field("algorithm_issues"),
      conflicts,
      revision_reason: str_field("revision_reason"),
    }),
  }
}
