//! Draft generation: build a request against the latest persona, make
//! one structured-generation call, parse the payload into typed drafts,
//! and persist every draft with its provenance.
//!
//! Parsing is permissive: items survive out-of-vocabulary category
//! values (the offending field is dropped or defaulted), and an
//! error-tagged or malformed payload parses to zero drafts rather than
//! failing the operation.

use serde_json::Value;
use uuid::Uuid;
use voxprint_core::{
  draft::{
    AlgoMetadata, Draft, DraftKind, DraftProvenance, DraftText, Engagement,
    ReplyContext, ReplyIntent, ReplyTone, RiskLevel,
  },
  persona::{Level, Persona},
  store::{PersonaStore, RecordQuery},
};
use voxprint_llm::{JsonRequest, LlmProvider};

use crate::{Error, Result, prompts, request_hash, retrieval};

/// How many recent records form the candidate pool for example
/// retrieval, and how many examples make it into a request.
pub const EXAMPLE_POOL: usize = 100;
pub const EXAMPLE_LIMIT: usize = 5;

const GENERATION_TEMPERATURE: f32 = 0.7;

// ─── Request specs ───────────────────────────────────────────────────────────

/// Parameters for topical tweet generation.
#[derive(Debug, Clone)]
pub struct TweetSpec {
  pub topic:             String,
  pub n:                 usize,
  pub spice:             Level,
  pub min_chars:         u32,
  pub max_chars:         u32,
  pub use_examples:      bool,
  pub target_engagement: Engagement,
}

impl TweetSpec {
  pub fn new(topic: impl Into<String>) -> Self {
    Self {
      topic:             topic.into(),
      n:                 5,
      spice:             Level::Medium,
      min_chars:         0,
      max_chars:         280,
      use_examples:      false,
      target_engagement: Engagement::Reply,
    }
  }
}

/// Parameters for thread generation.
#[derive(Debug, Clone)]
pub struct ThreadSpec {
  pub topic:       String,
  pub tweet_count: usize,
  pub spice:       Level,
  /// Full drafts when set; a per-tweet outline otherwise.
  pub full_draft:  bool,
  pub min_chars:   u32,
  pub max_chars:   u32,
}

impl ThreadSpec {
  pub fn new(topic: impl Into<String>) -> Self {
    Self {
      topic:       topic.into(),
      tweet_count: 5,
      spice:       Level::Medium,
      full_draft:  false,
      min_chars:   0,
      max_chars:   280,
    }
  }
}

/// Parameters for reply generation.
#[derive(Debug, Clone)]
pub struct ReplySpec {
  /// The post being replied to, verbatim.
  pub to_text:   String,
  pub tone:      ReplyTone,
  pub n:         usize,
  pub min_chars: u32,
  pub max_chars: u32,
  pub context:   Option<String>,
  pub intent:    Option<ReplyIntent>,
}

impl ReplySpec {
  pub fn new(to_text: impl Into<String>) -> Self {
    Self {
      to_text:   to_text.into(),
      tone:      ReplyTone::Neutral,
      n:         3,
      min_chars: 0,
      max_chars: 280,
      context:   None,
      intent:    None,
    }
  }
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// Generate and persist tweet drafts.
pub async fn generate_tweets<S, P>(
  store: &S,
  provider: &P,
  spec: TweetSpec,
) -> Result<Vec<Draft>>
where
  S: PersonaStore,
  P: LlmProvider,
{
  let persona = require_persona(store).await?;

  let examples = if spec.use_examples {
    let pool = store
      .recent_records(RecordQuery {
        limit: Some(EXAMPLE_POOL),
        ..RecordQuery::default()
      })
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    Some(retrieval::similar_texts(&pool, &spec.topic, EXAMPLE_LIMIT))
  } else {
    None
  };

  let prompt = prompts::tweet_request(&persona, &spec, examples.as_deref());
  let response = provider
    .generate_json(
      JsonRequest::new(&prompt, loose_schema())
        .with_temperature(GENERATION_TEMPERATURE),
    )
    .await;

  let drafts = parse_tweet_items(&response, &spec, persona.version);
  persist_all(store, provider, &drafts, &prompt).await?;
  Ok(drafts)
}

/// Generate and persist a thread (outline or full draft). If the payload
/// recommends fewer tweets than parsed — a density-insufficiency signal
/// — the list is truncated to the recommendation; generation never pads.
pub async fn generate_thread<S, P>(
  store: &S,
  provider: &P,
  spec: ThreadSpec,
) -> Result<Vec<Draft>>
where
  S: PersonaStore,
  P: LlmProvider,
{
  let persona = require_persona(store).await?;

  let prompt = prompts::thread_request(&persona, &spec);
  let response = provider
    .generate_json(
      JsonRequest::new(&prompt, loose_schema())
        .with_temperature(GENERATION_TEMPERATURE),
    )
    .await;

  let mut drafts = parse_thread_items(&response, &spec, persona.version);

  if let Some(recommended) =
    response.get("recommended_tweet_count").and_then(Value::as_u64)
    && (recommended as usize) < drafts.len()
  {
    tracing::debug!(
      parsed = drafts.len(),
      recommended,
      "truncating thread to recommended count"
    );
    drafts.truncate(recommended as usize);
  }

  persist_all(store, provider, &drafts, &prompt).await?;
  Ok(drafts)
}

/// Generate and persist reply drafts.
pub async fn generate_replies<S, P>(
  store: &S,
  provider: &P,
  spec: ReplySpec,
) -> Result<Vec<Draft>>
where
  S: PersonaStore,
  P: LlmProvider,
{
  let persona = require_persona(store).await?;

  let prompt = prompts::reply_request(&persona, &spec);
  let response = provider
    .generate_json(
      JsonRequest::new(&prompt, loose_schema())
        .with_temperature(GENERATION_TEMPERATURE),
    )
    .await;

  let drafts = parse_reply_items(&response, &spec, persona.version);
  persist_all(store, provider, &drafts, &prompt).await?;
  Ok(drafts)
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

pub(crate) async fn require_persona<S>(store: &S) -> Result<Persona>
where
  S: PersonaStore,
{
  store
    .latest_persona()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NoPersona)
}

fn loose_schema() -> Value {
  serde_json::json!({ "type": "object" })
}

async fn persist_all<S, P>(
  store: &S,
  provider: &P,
  drafts: &[Draft],
  prompt: &str,
) -> Result<()>
where
  S: PersonaStore,
  P: LlmProvider,
{
  let provenance = DraftProvenance {
    provider:    provider.name().to_string(),
    model:       provider.model().to_string(),
    prompt_hash: request_hash(prompt),
  };

  for draft in drafts {
    store
      .save_draft(draft, &provenance)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
  }

  tracing::info!(
    count = drafts.len(),
    provider = %provenance.provider,
    prompt_hash = %provenance.prompt_hash,
    "drafts persisted"
  );
  Ok(())
}

fn str_field(item: &Value, key: &str) -> Option<String> {
  item.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn string_list(item: &Value, key: &str) -> Vec<String> {
  item
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
}

fn confidence_field(item: &Value) -> f64 {
  item.get("confidence").and_then(Value::as_f64).unwrap_or(0.8)
}

// ─── Parsers ─────────────────────────────────────────────────────────────────

/// An error-tagged payload (or anything without the expected list) parses
/// to zero drafts.
fn payload_items<'a>(response: &'a Value, key: &str) -> &'a [Value] {
  if response.get("error").is_some() {
    return &[];
  }
  response
    .get(key)
    .and_then(Value::as_array)
    .map(Vec::as_slice)
    .unwrap_or(&[])
}

pub(crate) fn parse_tweet_items(
  response: &Value,
  spec: &TweetSpec,
  persona_version: i64,
) -> Vec<Draft> {
  payload_items(response, "drafts")
    .iter()
    .filter(|item| item.is_object())
    .map(|item| {
      // Out-of-vocabulary category values are nulled, not fatal.
      let expected_engagement = str_field(item, "expected_engagement")
        .and_then(|s| Engagement::parse(&s));
      let suppression_risk = str_field(item, "suppression_risk")
        .and_then(|s| RiskLevel::parse(&s));
      let notes = str_field(item, "algorithm_alignment_notes");

      let algo = AlgoMetadata {
        expected_engagement,
        suppression_risk,
        notes,
        ..AlgoMetadata::default()
      };

      Draft {
        id: Uuid::new_v4(),
        kind: DraftKind::Tweet,
        topic: spec.topic.clone(),
        text: DraftText::Single(
          str_field(item, "text").unwrap_or_default(),
        ),
        tags: string_list(item, "tags"),
        spice: spec.spice,
        persona_version,
        rationale: str_field(item, "rationale").unwrap_or_default(),
        confidence: confidence_field(item),
        reply: None,
        algo: (!algo.is_empty()).then_some(algo),
      }
    })
    .collect()
}

pub(crate) fn parse_thread_items(
  response: &Value,
  spec: &ThreadSpec,
  persona_version: i64,
) -> Vec<Draft> {
  let kind = if spec.full_draft {
    DraftKind::ThreadDraft
  } else {
    DraftKind::ThreadOutline
  };

  // Thread-level signals apply to every item; hook strength only to the
  // first.
  let density_validated = response
    .get("density_validated")
    .and_then(Value::as_bool)
    .unwrap_or(true);
  let hook_strength = str_field(response, "hook_strength")
    .unwrap_or_else(|| "moderate".to_string());
  let flagged_risks = response
    .get("suppression_risks")
    .and_then(Value::as_array)
    .map(|risks| !risks.is_empty())
    .unwrap_or(false);
  let suppression_risk =
    if flagged_risks { RiskLevel::Medium } else { RiskLevel::Low };
  let rationale = str_field(response, "rationale").unwrap_or_default();

  payload_items(response, "thread")
    .iter()
    .filter(|item| item.is_object())
    .enumerate()
    .map(|(index, item)| {
      let purpose =
        str_field(item, "purpose").unwrap_or_else(|| "body".to_string());
      let density_score = str_field(item, "density_score")
        .unwrap_or_else(|| "medium".to_string());

      Draft {
        id: Uuid::new_v4(),
        kind,
        topic: spec.topic.clone(),
        text: DraftText::Single(
          str_field(item, "text").unwrap_or_default(),
        ),
        tags: vec![purpose.clone()],
        spice: spec.spice,
        persona_version,
        rationale: rationale.clone(),
        confidence: confidence_field(item),
        reply: None,
        algo: Some(AlgoMetadata {
          suppression_risk: Some(suppression_risk),
          notes: Some(format!(
            "Density: {density_score}, Purpose: {purpose}"
          )),
          hook_strength: (index == 0).then(|| hook_strength.clone()),
          density_validated: Some(density_validated),
          unique_value: str_field(item, "unique_value"),
          ..AlgoMetadata::default()
        }),
      }
    })
    .collect()
}

pub(crate) fn parse_reply_items(
  response: &Value,
  spec: &ReplySpec,
  persona_version: i64,
) -> Vec<Draft> {
  payload_items(response, "replies")
    .iter()
    .filter(|item| item.is_object())
    .map(|item| {
      let approach =
        str_field(item, "approach").unwrap_or_else(|| "react".to_string());
      let intent = str_field(item, "intent")
        .or_else(|| Some(approach.clone()))
        .and_then(|s| ReplyIntent::parse(&s))
        .unwrap_or_default();

      // Reply-path categories fall back instead of nulling.
      let suppression_risk = str_field(item, "suppression_risk")
        .and_then(|s| RiskLevel::parse(&s))
        .unwrap_or(RiskLevel::Low);
      let conversation_value = str_field(item, "conversation_value")
        .and_then(|s| Level::parse(&s))
        .unwrap_or(Level::Medium);
      let unique_value = str_field(item, "value_added");

      let notes = format!(
        "Intent: {}, Value: {}",
        intent.as_str(),
        unique_value
          .as_deref()
          .map(|v| v.chars().take(50).collect::<String>())
          .unwrap_or_else(|| "N/A".to_string()),
      );

      Draft {
        id: Uuid::new_v4(),
        kind: DraftKind::Reply,
        topic: reply_topic(&spec.to_text),
        text: DraftText::Single(
          str_field(item, "text").unwrap_or_default(),
        ),
        tags: vec![approach],
        spice: Level::Medium,
        persona_version,
        rationale: str_field(item, "rationale").unwrap_or_default(),
        confidence: confidence_field(item),
        reply: Some(ReplyContext {
          to_text: spec.to_text.clone(),
          tone:    spec.tone,
          intent:  Some(intent),
        }),
        algo: Some(AlgoMetadata {
          suppression_risk: Some(suppression_risk),
          conversation_value: Some(conversation_value),
          unique_value,
          notes: Some(notes),
          ..AlgoMetadata::default()
        }),
      }
    })
    .collect()
}

/// Reply drafts are keyed under a truncated view of their target.
fn reply_topic(to_text: &str) -> String {
  let head: String = to_text.chars().take(50).collect();
  format!("reply:{head}...")
}
