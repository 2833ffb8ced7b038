//! Integration tests for `SqliteStore` against an in-memory database.

use uuid::Uuid;
use voxprint_core::{
  draft::{
    AlgoMetadata, Draft, DraftKind, DraftProvenance, DraftText, Engagement,
    ReplyContext, ReplyIntent, ReplyTone, RiskLevel,
  },
  persona::{Level, Persona, Topic},
  record::NewRecord,
  review::{AlgoReview, PersonaAlgoConflict, Review},
  store::{InsertOutcome, PersonaStore, RecordQuery},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn record(id: &str, day: u32) -> NewRecord {
  NewRecord {
    record_id:  id.to_string(),
    created_at: format!("2024-03-{day:02}T12:00:00Z"),
    text:       format!("post {id}"),
    url:        Some(format!("https://x.example/{id}")),
    origin:     "extension".into(),
    lang:       Some("en".into()),
    metrics:    None,
    raw:        None,
  }
}

fn provenance() -> DraftProvenance {
  DraftProvenance {
    provider:    "cloud".into(),
    model:       "gpt-4o-mini".into(),
    prompt_hash: "abc123def456".into(),
  }
}

async fn seeded_persona_version(s: &SqliteStore) -> i64 {
  s.save_persona(&Persona::default()).await.unwrap()
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_count() {
  let s = store().await;

  let outcome = s.insert_record(record("1", 1)).await.unwrap();
  assert_eq!(outcome, InsertOutcome::Inserted);
  assert_eq!(s.record_count().await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_identifier_is_skipped_not_overwritten() {
  let s = store().await;

  s.insert_record(record("1", 1)).await.unwrap();

  let mut dupe = record("1", 9);
  dupe.text = "a different body".into();
  let outcome = s.insert_record(dupe).await.unwrap();

  assert_eq!(outcome, InsertOutcome::Duplicate);
  assert_eq!(s.record_count().await.unwrap(), 1);

  // The first insert wins; the colliding row never updates.
  let all = s.records_chronological().await.unwrap();
  assert_eq!(all[0].text, "post 1");
}

#[tokio::test]
async fn batch_insert_counts_duplicates() {
  let s = store().await;
  s.insert_record(record("1", 1)).await.unwrap();

  let outcome = s
    .insert_records(vec![record("1", 1), record("2", 2), record("3", 3)])
    .await
    .unwrap();

  assert_eq!(outcome.inserted, 2);
  assert_eq!(outcome.duplicate, 1);
  assert_eq!(s.record_count().await.unwrap(), 3);
}

#[tokio::test]
async fn batch_insert_dedupes_within_the_batch() {
  let s = store().await;

  let outcome = s
    .insert_records(vec![record("1", 1), record("1", 1), record("2", 2)])
    .await
    .unwrap();

  assert_eq!(outcome.inserted, 2);
  assert_eq!(outcome.duplicate, 1);
}

#[tokio::test]
async fn recent_records_are_newest_first() {
  let s = store().await;
  s.insert_records(vec![record("a", 1), record("b", 15), record("c", 8)])
    .await
    .unwrap();

  let recent = s
    .recent_records(RecordQuery { limit: Some(2), ..Default::default() })
    .await
    .unwrap();

  assert_eq!(recent.len(), 2);
  assert_eq!(recent[0].record_id, "b");
  assert_eq!(recent[1].record_id, "c");
}

#[tokio::test]
async fn recent_records_since_filters_by_timestamp() {
  let s = store().await;
  s.insert_records(vec![record("a", 1), record("b", 15), record("c", 8)])
    .await
    .unwrap();

  let recent = s
    .recent_records(RecordQuery {
      since: Some("2024-03-08T00:00:00Z".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  let ids: Vec<_> = recent.iter().map(|r| r.record_id.as_str()).collect();
  assert_eq!(ids, ["b", "c"]);
}

#[tokio::test]
async fn chronological_order_and_metrics_roundtrip() {
  let s = store().await;

  let mut with_metrics = record("m", 3);
  with_metrics.metrics = Some(
    [("like".to_string(), serde_json::json!(42))]
      .into_iter()
      .collect(),
  );
  with_metrics.raw = Some(serde_json::json!({ "tweet_id": "m" }));

  s.insert_records(vec![record("z", 9), with_metrics]).await.unwrap();

  let all = s.records_chronological().await.unwrap();
  assert_eq!(all[0].record_id, "m");
  assert_eq!(all[1].record_id, "z");
  assert_eq!(
    all[0].metrics.as_ref().unwrap().get("like"),
    Some(&serde_json::json!(42))
  );
  assert!(all[0].raw.is_some());
}

// ─── Personas ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_persona_on_empty_store_is_none() {
  let s = store().await;
  assert!(s.latest_persona().await.unwrap().is_none());
}

#[tokio::test]
async fn persona_versions_increase_monotonically() {
  let s = store().await;

  let v1 = s.save_persona(&Persona::default()).await.unwrap();
  let v2 = s.save_persona(&Persona::default()).await.unwrap();
  let v3 = s.save_persona(&Persona::default()).await.unwrap();

  assert_eq!(v1, 1);
  assert!(v2 > v1);
  assert!(v3 > v2);
}

#[tokio::test]
async fn latest_persona_returns_max_version() {
  let s = store().await;

  s.save_persona(&Persona {
    display_name: "first".into(),
    ..Persona::default()
  })
  .await
  .unwrap();
  let v2 = s
    .save_persona(&Persona {
      display_name: "second".into(),
      ..Persona::default()
    })
    .await
    .unwrap();

  let latest = s.latest_persona().await.unwrap().unwrap();
  assert_eq!(latest.version, v2);
  assert_eq!(latest.display_name, "second");
}

#[tokio::test]
async fn stored_version_field_is_overridden_by_row_version() {
  let s = store().await;

  // Whatever version the value claims, the store's assignment wins.
  let persona = Persona { version: 999, ..Persona::default() };
  let assigned = s.save_persona(&persona).await.unwrap();
  assert_eq!(assigned, 1);

  let read = s.persona_by_version(assigned).await.unwrap().unwrap();
  assert_eq!(read.version, 1);
}

#[tokio::test]
async fn all_persona_versions_are_retained() {
  let s = store().await;
  for name in ["a", "b", "c"] {
    s.save_persona(&Persona {
      display_name: name.into(),
      ..Persona::default()
    })
    .await
    .unwrap();
  }

  assert_eq!(
    s.persona_by_version(1).await.unwrap().unwrap().display_name,
    "a"
  );
  assert_eq!(
    s.persona_by_version(2).await.unwrap().unwrap().display_name,
    "b"
  );
  assert!(s.persona_by_version(9).await.unwrap().is_none());
}

#[tokio::test]
async fn persona_topics_roundtrip() {
  let s = store().await;
  let persona = Persona {
    topics: vec![
      Topic { name: "rust".into(), weight: 0.7 },
      Topic { name: "distributed systems".into(), weight: 0.3 },
    ],
    ..Persona::default()
  };

  let version = s.save_persona(&persona).await.unwrap();
  let read = s.persona_by_version(version).await.unwrap().unwrap();
  assert_eq!(read.topics, persona.topics);
}

// ─── Drafts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn tweet_draft_roundtrips_with_algo_bundle() {
  let s = store().await;
  let version = seeded_persona_version(&s).await;

  let draft = Draft {
    id:              Uuid::new_v4(),
    kind:            DraftKind::Tweet,
    topic:           "rust async".into(),
    text:            DraftText::Single("Lifetimes are a feature.".into()),
    tags:            vec!["observation".into()],
    spice:           Level::High,
    persona_version: version,
    rationale:       "matches the dry register".into(),
    confidence:      0.85,
    reply:           None,
    algo:            Some(AlgoMetadata {
      expected_engagement: Some(Engagement::Reply),
      suppression_risk:    Some(RiskLevel::Low),
      notes:               Some("statement form, no bait".into()),
      ..AlgoMetadata::default()
    }),
  };

  s.save_draft(&draft, &provenance()).await.unwrap();

  let read = s.draft_by_id(draft.id).await.unwrap().unwrap();
  assert_eq!(read, draft);
}

#[tokio::test]
async fn thread_draft_preserves_item_order() {
  let s = store().await;
  let version = seeded_persona_version(&s).await;

  let parts = vec![
    "Hook: the build is slow for one reason.".to_string(),
    "Reason: the linker.".to_string(),
    "Fix: mold.".to_string(),
  ];
  let draft = Draft {
    id:              Uuid::new_v4(),
    kind:            DraftKind::ThreadDraft,
    topic:           "build times".into(),
    text:            DraftText::Thread(parts.clone()),
    tags:            vec!["hook".into()],
    spice:           Level::Medium,
    persona_version: version,
    rationale:       String::new(),
    confidence:      0.8,
    reply:           None,
    algo:            None,
  };

  s.save_draft(&draft, &provenance()).await.unwrap();

  let read = s.draft_by_id(draft.id).await.unwrap().unwrap();
  assert_eq!(read.text, DraftText::Thread(parts));
}

#[tokio::test]
async fn single_item_sequence_reads_back_as_scalar() {
  let s = store().await;
  let version = seeded_persona_version(&s).await;

  // A one-part thread and a plain tweet are the same stored shape; a
  // length-1 sequence always renders as a scalar on the way out.
  let draft = Draft {
    id:              Uuid::new_v4(),
    kind:            DraftKind::ThreadOutline,
    topic:           "short thread".into(),
    text:            DraftText::Thread(vec!["only item".into()]),
    tags:            vec![],
    spice:           Level::Medium,
    persona_version: version,
    rationale:       String::new(),
    confidence:      0.8,
    reply:           None,
    algo:            None,
  };

  s.save_draft(&draft, &provenance()).await.unwrap();

  let read = s.draft_by_id(draft.id).await.unwrap().unwrap();
  assert_eq!(read.text, DraftText::Single("only item".into()));
}

#[tokio::test]
async fn reply_draft_roundtrips_reply_context() {
  let s = store().await;
  let version = seeded_persona_version(&s).await;

  let draft = Draft {
    id:              Uuid::new_v4(),
    kind:            DraftKind::Reply,
    topic:           "reply:everyone should rewrite their backend in...".into(),
    text:            DraftText::Single("Counterpoint: migrations have a cost.".into()),
    tags:            vec!["disagree_reason".into()],
    spice:           Level::Medium,
    persona_version: version,
    rationale:       String::new(),
    confidence:      0.9,
    reply:           Some(ReplyContext {
      to_text: "everyone should rewrite their backend in zig".into(),
      tone:    ReplyTone::Critical,
      intent:  Some(ReplyIntent::DisagreeReason),
    }),
    algo:            Some(AlgoMetadata {
      suppression_risk:   Some(RiskLevel::Low),
      conversation_value: Some(Level::High),
      unique_value:       Some("cost framing".into()),
      ..AlgoMetadata::default()
    }),
  };

  s.save_draft(&draft, &provenance()).await.unwrap();

  let read = s.draft_by_id(draft.id).await.unwrap().unwrap();
  assert_eq!(read, draft);
}

#[tokio::test]
async fn recent_drafts_respects_limit() {
  let s = store().await;
  let version = seeded_persona_version(&s).await;

  for i in 0..5 {
    let draft = Draft {
      id:              Uuid::new_v4(),
      kind:            DraftKind::Tweet,
      topic:           format!("topic {i}"),
      text:            DraftText::Single(format!("draft {i}")),
      tags:            vec![],
      spice:           Level::Medium,
      persona_version: version,
      rationale:       String::new(),
      confidence:      0.8,
      reply:           None,
      algo:            None,
    };
    s.save_draft(&draft, &provenance()).await.unwrap();
  }

  let recent = s.recent_drafts(3).await.unwrap();
  assert_eq!(recent.len(), 3);
}

#[tokio::test]
async fn draft_by_id_missing_returns_none() {
  let s = store().await;
  assert!(s.draft_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

async fn seeded_draft(s: &SqliteStore) -> Draft {
  let version = seeded_persona_version(s).await;
  let draft = Draft {
    id:              Uuid::new_v4(),
    kind:            DraftKind::Tweet,
    topic:           "reviews".into(),
    text:            DraftText::Single("a draft worth reviewing".into()),
    tags:            vec![],
    spice:           Level::Medium,
    persona_version: version,
    rationale:       String::new(),
    confidence:      0.8,
    reply:           None,
    algo:            None,
  };
  s.save_draft(&draft, &provenance()).await.unwrap();
  draft
}

#[tokio::test]
async fn reviews_append_and_are_never_merged() {
  let s = store().await;
  let draft = seeded_draft(&s).await;

  for score in [55.0, 82.0] {
    let review = Review {
      id:              Uuid::new_v4(),
      draft_id:        draft.id,
      alignment_score: score,
      violations:      vec![],
      suggestions:     vec![],
      revised_text:    None,
      algo:            None,
    };
    s.save_review(&review).await.unwrap();
  }

  let history = s.reviews_for_draft(draft.id).await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[0].alignment_score, 82.0);
  assert_eq!(history[1].alignment_score, 55.0);
}

#[tokio::test]
async fn review_roundtrips_algo_bundle_and_revision() {
  let s = store().await;
  let draft = seeded_draft(&s).await;

  let review = Review {
    id:              Uuid::new_v4(),
    draft_id:        draft.id,
    alignment_score: 64.0,
    violations:      vec!["too hedged for this voice".into()],
    suggestions:     vec!["cut the first clause".into()],
    revised_text:    Some("A draft worth reviewing.".into()),
    algo:            Some(AlgoReview {
      algorithm_score:    Some(71.0),
      suppression_score:  Some(12.0),
      repetition_risk:    RiskLevel::Low,
      conversation_value: Level::Medium,
      issues:             vec!["weak hook".into()],
      conflicts:          vec![PersonaAlgoConflict {
        persona_rule:         "always open with a question".into(),
        algorithm_constraint: "question openers read as bait".into(),
        resolution:           "kept the statement form".into(),
      }],
      revision_reason:    Some("low alignment".into()),
    }),
  };

  s.save_review(&review).await.unwrap();

  let history = s.reviews_for_draft(draft.id).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0], review);
}

#[tokio::test]
async fn reviews_for_unknown_draft_are_empty() {
  let s = store().await;
  assert!(s.reviews_for_draft(Uuid::new_v4()).await.unwrap().is_empty());
}
