//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Store-assigned timestamps are RFC 3339 strings. Structured fields
//! (metrics, tags, reply context, algorithm bundles) are stored as
//! compact JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use voxprint_core::{
  draft::{
    AlgoMetadata, Draft, DraftKind, DraftText, ReplyContext,
  },
  persona::Level,
  record::{Metrics, SourceRecord},
  review::{AlgoReview, Review},
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── DraftKind ───────────────────────────────────────────────────────────────

pub fn encode_draft_kind(k: DraftKind) -> &'static str { k.as_str() }

pub fn decode_draft_kind(s: &str) -> Result<DraftKind> {
  DraftKind::parse(s).ok_or_else(|| Error::UnknownDraftKind(s.to_owned()))
}

// ─── Spice level ─────────────────────────────────────────────────────────────

pub fn encode_spice(level: Level) -> &'static str { level.as_str() }

pub fn decode_spice(s: &str) -> Result<Level> {
  Level::parse(s).ok_or_else(|| Error::UnknownSpiceLevel(s.to_owned()))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_text_parts(text: &DraftText) -> Result<String> {
  Ok(serde_json::to_string(&text.to_parts())?)
}

pub fn encode_metrics(metrics: &Metrics) -> Result<String> {
  Ok(serde_json::to_string(metrics)?)
}

pub fn encode_reply(reply: &ReplyContext) -> Result<String> {
  Ok(serde_json::to_string(reply)?)
}

pub fn encode_algo(algo: &AlgoMetadata) -> Result<String> {
  Ok(serde_json::to_string(algo)?)
}

pub fn encode_algo_review(algo: &AlgoReview) -> Result<String> {
  Ok(serde_json::to_string(algo)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `records` row.
pub struct RawRecord {
  pub record_id:    String,
  pub created_at:   String,
  pub text:         String,
  pub url:          Option<String>,
  pub origin:       String,
  pub lang:         Option<String>,
  pub metrics_json: Option<String>,
  pub raw_json:     Option<String>,
}

impl RawRecord {
  pub fn into_record(self) -> Result<SourceRecord> {
    let metrics = self
      .metrics_json
      .as_deref()
      .map(serde_json::from_str::<Metrics>)
      .transpose()?;
    let raw = self
      .raw_json
      .as_deref()
      .map(serde_json::from_str::<serde_json::Value>)
      .transpose()?;

    Ok(SourceRecord {
      record_id: self.record_id,
      created_at: self.created_at,
      text: self.text,
      url: self.url,
      origin: self.origin,
      lang: self.lang,
      metrics,
      raw,
    })
  }
}

/// Raw strings read directly from a `drafts` row.
pub struct RawDraft {
  pub id:              String,
  pub kind:            String,
  pub topic:           String,
  pub spice:           String,
  pub persona_version: i64,
  pub text_json:       String,
  pub tags_json:       String,
  pub rationale:       String,
  pub confidence:      f64,
  pub reply_json:      Option<String>,
  pub algo_json:       Option<String>,
}

impl RawDraft {
  pub fn into_draft(self) -> Result<Draft> {
    let parts: Vec<String> = serde_json::from_str(&self.text_json)?;
    let reply = self
      .reply_json
      .as_deref()
      .map(serde_json::from_str::<ReplyContext>)
      .transpose()?;
    let algo = self
      .algo_json
      .as_deref()
      .map(serde_json::from_str::<AlgoMetadata>)
      .transpose()?;

    Ok(Draft {
      id: decode_uuid(&self.id)?,
      kind: decode_draft_kind(&self.kind)?,
      topic: self.topic,
      text: DraftText::from_parts(parts),
      tags: decode_tags(&self.tags_json)?,
      spice: decode_spice(&self.spice)?,
      persona_version: self.persona_version,
      rationale: self.rationale,
      confidence: self.confidence,
      reply,
      algo,
    })
  }
}

/// Raw strings read directly from a `reviews` row.
pub struct RawReview {
  pub id:               String,
  pub draft_id:         String,
  pub alignment_score:  f64,
  pub violations_json:  String,
  pub suggestions_json: String,
  pub revised_text:     Option<String>,
  pub algo_json:        Option<String>,
}

impl RawReview {
  pub fn into_review(self) -> Result<Review> {
    let algo = self
      .algo_json
      .as_deref()
      .map(serde_json::from_str::<AlgoReview>)
      .transpose()?;

    Ok(Review {
      id: decode_uuid(&self.id)?,
      draft_id: decode_uuid(&self.draft_id)?,
      alignment_score: self.alignment_score,
      violations: decode_tags(&self.violations_json)?,
      suggestions: decode_tags(&self.suggestions_json)?,
      revised_text: self.revised_text,
      algo,
    })
  }
}
