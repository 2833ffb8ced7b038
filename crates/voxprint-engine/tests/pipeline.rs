//! End-to-end pipeline tests over an in-memory store and a scripted
//! provider: import → profile → generate → review.

use std::sync::{
  Mutex,
  atomic::{AtomicUsize, Ordering},
};

use serde_json::{Value, json};
use voxprint_core::{
  draft::{DraftKind, DraftText, RiskLevel},
  persona::Level,
  store::{PersonaStore, RecordQuery},
};
use voxprint_engine::{
  Error,
  generator::{
    ReplySpec, ThreadSpec, TweetSpec, generate_replies, generate_thread,
    generate_tweets,
  },
  profiler::{ProfileOptions, build_persona},
  reviewer::review_recent,
};
use voxprint_import::import_file;
use voxprint_llm::{
  JsonRequest, LlmProvider, Result as LlmResult, TextRequest,
};
use voxprint_store_sqlite::SqliteStore;

// ─── Scripted provider ───────────────────────────────────────────────────────

/// Serves queued JSON payloads in order and counts calls; repeats the
/// last payload when the queue runs dry.
struct ScriptedProvider {
  responses: Mutex<Vec<Value>>,
  calls:     AtomicUsize,
}

impl ScriptedProvider {
  fn new(responses: Vec<Value>) -> Self {
    Self { responses: Mutex::new(responses), calls: AtomicUsize::new(0) }
  }

  fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

impl LlmProvider for ScriptedProvider {
  fn name(&self) -> &'static str { "scripted" }

  fn model(&self) -> &str { "scripted-model" }

  async fn generate_text(&self, _request: TextRequest) -> LlmResult<String> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Ok("scripted text".to_string())
  }

  async fn generate_json(&self, _request: JsonRequest) -> Value {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let mut responses = self.responses.lock().unwrap();
    if responses.len() > 1 {
      responses.remove(0)
    } else {
      responses
        .first()
        .cloned()
        .unwrap_or_else(|| json!({ "error": "script exhausted" }))
    }
  }
}

fn persona_payload() -> Value {
  json!({
    "display_name": "Scripted Voice",
    "voice_rules": { "sentence_length": "short", "directness": "high" },
    "topics": [{ "name": "testing", "weight": 0.8 }]
  })
}

async fn store_with_records(n: usize) -> SqliteStore {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let records = (0..n)
    .map(|i| voxprint_core::record::NewRecord {
      record_id:  format!("r{i}"),
      created_at: format!("2024-01-{:02}T00:00:00Z", i % 28 + 1),
      text:       format!("historical post {i} about testing"),
      origin:     "extension".into(),
      ..Default::default()
    })
    .collect();
  store.insert_records(records).await.unwrap();
  store
}

async fn store_with_persona() -> (SqliteStore, i64) {
  let store = store_with_records(3).await;
  let provider = ScriptedProvider::new(vec![persona_payload()]);
  let persona = build_persona(&store, &provider, ProfileOptions::default())
    .await
    .unwrap();
  (store, persona.version)
}

fn temp_path(name: &str) -> std::path::PathBuf {
  std::env::temp_dir().join(format!(
    "voxprint-pipeline-{}-{name}",
    uuid::Uuid::new_v4()
  ))
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_build_makes_exactly_one_call_and_reuse_makes_none() {
  let store = store_with_records(5).await;
  let provider = ScriptedProvider::new(vec![persona_payload()]);

  let first = build_persona(&store, &provider, ProfileOptions::default())
    .await
    .unwrap();
  assert_eq!(first.version, 1);
  assert_eq!(provider.calls(), 1);

  // force=false with an existing persona: no provider call, same version.
  let second = build_persona(&store, &provider, ProfileOptions::default())
    .await
    .unwrap();
  assert_eq!(second.version, 1);
  assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn forced_rebuild_creates_a_new_version() {
  let store = store_with_records(5).await;
  let provider =
    ScriptedProvider::new(vec![persona_payload(), persona_payload()]);

  let first = build_persona(&store, &provider, ProfileOptions::default())
    .await
    .unwrap();
  let second = build_persona(
    &store,
    &provider,
    ProfileOptions { force: true, ..ProfileOptions::default() },
  )
  .await
  .unwrap();

  assert_eq!(first.version, 1);
  assert_eq!(second.version, 2);
  assert_eq!(provider.calls(), 2);

  // Both versions are retained; latest is the rebuild.
  let latest = store.latest_persona().await.unwrap().unwrap();
  assert_eq!(latest.version, 2);
  assert!(store.persona_by_version(1).await.unwrap().is_some());
}

#[tokio::test]
async fn profiling_an_empty_store_fails_with_no_records() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let provider = ScriptedProvider::new(vec![persona_payload()]);

  let err = build_persona(&store, &provider, ProfileOptions::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NoRecords));
  assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn display_name_override_applies_before_save() {
  let store = store_with_records(3).await;
  let provider = ScriptedProvider::new(vec![persona_payload()]);

  let persona = build_persona(
    &store,
    &provider,
    ProfileOptions {
      display_name: Some("Renamed".into()),
      ..ProfileOptions::default()
    },
  )
  .await
  .unwrap();

  assert_eq!(persona.display_name, "Renamed");
  let stored = store.latest_persona().await.unwrap().unwrap();
  assert_eq!(stored.display_name, "Renamed");
}

#[tokio::test]
async fn error_tagged_extraction_fails_without_writing_a_version() {
  let store = store_with_records(3).await;
  let provider =
    ScriptedProvider::new(vec![json!({ "error": "nothing usable" })]);

  let err = build_persona(&store, &provider, ProfileOptions::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Extraction(_)));
  assert!(store.latest_persona().await.unwrap().is_none());
}

// ─── Generation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn generation_without_a_persona_is_a_recoverable_error() {
  let store = store_with_records(3).await;
  let provider = ScriptedProvider::new(vec![]);

  let err = generate_tweets(&store, &provider, TweetSpec::new("rust"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NoPersona));
  assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn generated_tweets_are_persisted_with_provenance() {
  let (store, version) = store_with_persona().await;
  let provider = ScriptedProvider::new(vec![json!({
    "drafts": [
      { "text": "draft one", "tags": ["a"], "confidence": 0.9 },
      { "text": "draft two", "tags": ["b"] }
    ]
  })]);

  let drafts = generate_tweets(&store, &provider, TweetSpec::new("testing"))
    .await
    .unwrap();
  assert_eq!(drafts.len(), 2);
  assert!(drafts.iter().all(|d| d.persona_version == version));

  let stored = store.recent_drafts(10).await.unwrap();
  assert_eq!(stored.len(), 2);
  assert!(stored.iter().all(|d| d.kind == DraftKind::Tweet));
}

#[tokio::test]
async fn thread_truncates_to_recommended_count() {
  let (store, _) = store_with_persona().await;

  let items: Vec<Value> = (0..8)
    .map(|i| json!({ "text": format!("item {i}"), "purpose": "body" }))
    .collect();
  let provider = ScriptedProvider::new(vec![json!({
    "thread": items,
    "recommended_tweet_count": 5,
    "density_validated": true,
    "hook_strength": "strong",
    "suppression_risks": []
  })]);

  let mut spec = ThreadSpec::new("testing");
  spec.tweet_count = 8;
  spec.full_draft = true;
  let drafts = generate_thread(&store, &provider, spec).await.unwrap();

  // Eight parsed, five persisted — generation never pads, only trims.
  assert_eq!(drafts.len(), 5);
  assert_eq!(store.recent_drafts(20).await.unwrap().len(), 5);
  assert!(drafts.iter().all(|d| d.kind == DraftKind::ThreadDraft));
}

#[tokio::test]
async fn error_tagged_generation_persists_nothing() {
  let (store, _) = store_with_persona().await;
  let provider =
    ScriptedProvider::new(vec![json!({ "error": "model unavailable" })]);

  let drafts = generate_tweets(&store, &provider, TweetSpec::new("testing"))
    .await
    .unwrap();
  assert!(drafts.is_empty());
  assert!(store.recent_drafts(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn replies_carry_tone_and_target() {
  let (store, _) = store_with_persona().await;
  let provider = ScriptedProvider::new(vec![json!({
    "replies": [{
      "text": "A useful counterpoint.",
      "approach": "challenge",
      "suppression_risk": "low",
      "conversation_value": "high"
    }]
  })]);

  let mut spec = ReplySpec::new("original hot take");
  spec.tone = voxprint_core::draft::ReplyTone::Thoughtful;
  let drafts = generate_replies(&store, &provider, spec).await.unwrap();

  assert_eq!(drafts.len(), 1);
  let stored = store.draft_by_id(drafts[0].id).await.unwrap().unwrap();
  let reply = stored.reply.as_ref().unwrap();
  assert_eq!(reply.to_text, "original hot take");
  assert_eq!(reply.tone, voxprint_core::draft::ReplyTone::Thoughtful);
}

// ─── Review ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reviews_are_scored_and_persisted_per_draft() {
  let (store, _) = store_with_persona().await;

  let generate_provider = ScriptedProvider::new(vec![json!({
    "drafts": [{ "text": "draft a" }, { "text": "draft b" }]
  })]);
  generate_tweets(&store, &generate_provider, TweetSpec::new("testing"))
    .await
    .unwrap();

  let review_provider = ScriptedProvider::new(vec![
    json!({ "alignment_score": 91, "repetition_risk": "low" }),
    json!({ "alignment_score": 64, "repetition_risk": "high",
            "conversation_value": "low" }),
  ]);
  let reviews = review_recent(&store, &review_provider, 10, false)
    .await
    .unwrap();

  assert_eq!(reviews.len(), 2);
  assert_eq!(review_provider.calls(), 2);

  for review in &reviews {
    let history = store.reviews_for_draft(review.draft_id).await.unwrap();
    assert_eq!(history.len(), 1);
  }
}

#[tokio::test]
async fn failed_review_call_still_records_a_zero_score_review() {
  let (store, _) = store_with_persona().await;

  let generate_provider = ScriptedProvider::new(vec![json!({
    "drafts": [{ "text": "draft a" }]
  })]);
  let drafts =
    generate_tweets(&store, &generate_provider, TweetSpec::new("testing"))
      .await
      .unwrap();

  let review_provider =
    ScriptedProvider::new(vec![json!({ "error": "backend down" })]);
  let reviews = review_recent(&store, &review_provider, 10, false)
    .await
    .unwrap();

  assert_eq!(reviews.len(), 1);
  assert_eq!(reviews[0].alignment_score, 0.0);

  let history = store.reviews_for_draft(drafts[0].id).await.unwrap();
  assert_eq!(history.len(), 1);
  assert!(history[0].violations[0].contains("review extraction failed"));
}

#[tokio::test]
async fn thread_drafts_review_as_flattened_text() {
  let (store, version) = store_with_persona().await;

  // Store a two-part thread directly.
  let draft = voxprint_core::draft::Draft {
    id:              uuid::Uuid::new_v4(),
    kind:            DraftKind::ThreadDraft,
    topic:           "threads".into(),
    text:            DraftText::Thread(vec!["part one".into(), "part two".into()]),
    tags:            vec![],
    spice:           Level::Medium,
    persona_version: version,
    rationale:       String::new(),
    confidence:      0.8,
    reply:           None,
    algo:            None,
  };
  store
    .save_draft(
      &draft,
      &voxprint_core::draft::DraftProvenance {
        provider:    "scripted".into(),
        model:       "scripted-model".into(),
        prompt_hash: "000000000000".into(),
      },
    )
    .await
    .unwrap();

  let provider = ScriptedProvider::new(vec![json!({ "alignment_score": 75 })]);
  let reviews = review_recent(&store, &provider, 5, false).await.unwrap();
  assert_eq!(reviews.len(), 1);
  assert_eq!(reviews[0].draft_id, draft.id);
  let algo = reviews[0].algo.as_ref().unwrap();
  assert_eq!(algo.repetition_risk, RiskLevel::Low);
}

// ─── End-to-end scenario ─────────────────────────────────────────────────────

#[tokio::test]
async fn import_profile_scenario_end_to_end() {
  let store = SqliteStore::open_in_memory().await.unwrap();

  // Three line-delimited tweets: two unique ids, one duplicate id.
  let path = temp_path("scenario.jsonl");
  std::fs::write(
    &path,
    "{\"tweet_id\":\"t1\",\"created_at\":\"2024-01-01T00:00:00Z\",\"text\":\"first\"}\n\
     {\"tweet_id\":\"t2\",\"created_at\":\"2024-01-02T00:00:00Z\",\"text\":\"second\"}\n\
     {\"tweet_id\":\"t1\",\"created_at\":\"2024-01-03T00:00:00Z\",\"text\":\"dupe\"}\n",
  )
  .unwrap();

  let report = import_file(&store, &path).await.unwrap();
  std::fs::remove_file(&path).ok();

  assert_eq!(report.inserted, 2);
  assert_eq!(report.skipped_invalid, 0);
  assert_eq!(report.skipped_duplicate, 1);
  assert_eq!(report.total, 2);

  // First build: exactly one structured-generation call, version 1.
  let provider = ScriptedProvider::new(vec![persona_payload()]);
  let persona = build_persona(&store, &provider, ProfileOptions::default())
    .await
    .unwrap();
  assert_eq!(persona.version, 1);
  assert_eq!(provider.calls(), 1);

  // Second build with force=false: zero further calls, same version.
  let again = build_persona(&store, &provider, ProfileOptions::default())
    .await
    .unwrap();
  assert_eq!(again.version, 1);
  assert_eq!(provider.calls(), 1);

  // The stored records are exactly the two unique imports.
  let records = store
    .recent_records(RecordQuery::default())
    .await
    .unwrap();
  assert_eq!(records.len(), 2);
}
