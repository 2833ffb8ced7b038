//! Draft types — one generated unit of content.
//!
//! A draft is immutable once stored. Revisions never mutate a draft; they
//! arrive as `revised_text` on a later review.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::persona::Level;

// ─── Kinds & categories ──────────────────────────────────────────────────────

/// What kind of unit a draft is. The variant name doubles as the
/// discriminant stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftKind {
  Tweet,
  ThreadOutline,
  ThreadDraft,
  Reply,
}

impl DraftKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Tweet => "tweet",
      Self::ThreadOutline => "thread_outline",
      Self::ThreadDraft => "thread_draft",
      Self::Reply => "reply",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "tweet" => Some(Self::Tweet),
      "thread_outline" => Some(Self::ThreadOutline),
      "thread_draft" => Some(Self::ThreadDraft),
      "reply" => Some(Self::Reply),
      _ => None,
    }
  }
}

/// Heuristic likelihood that a ranking system would demote the content.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
  #[default]
  Low,
  Medium,
  High,
}

impl RiskLevel {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "low" => Some(Self::Low),
      "medium" => Some(Self::Medium),
      "high" => Some(Self::High),
      _ => None,
    }
  }
}

/// Which engagement signal a generated draft is aimed at.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Engagement {
  #[default]
  Reply,
  Like,
  Repost,
  Mixed,
}

impl Engagement {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Reply => "reply",
      Self::Like => "like",
      Self::Repost => "repost",
      Self::Mixed => "mixed",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "reply" => Some(Self::Reply),
      "like" => Some(Self::Like),
      "repost" => Some(Self::Repost),
      "mixed" => Some(Self::Mixed),
      _ => None,
    }
  }
}

// ─── Reply categories ────────────────────────────────────────────────────────

/// Emotional register requested for a reply.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ReplyTone {
  #[default]
  Neutral,
  Supportive,
  Curious,
  Playful,
  Sarcastic,
  Critical,
  Angry,
  Excited,
  Thoughtful,
}

impl ReplyTone {
  pub const ALL: &'static [&'static str] = &[
    "neutral",
    "supportive",
    "curious",
    "playful",
    "sarcastic",
    "critical",
    "angry",
    "excited",
    "thoughtful",
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Neutral => "neutral",
      Self::Supportive => "supportive",
      Self::Curious => "curious",
      Self::Playful => "playful",
      Self::Sarcastic => "sarcastic",
      Self::Critical => "critical",
      Self::Angry => "angry",
      Self::Excited => "excited",
      Self::Thoughtful => "thoughtful",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "neutral" => Some(Self::Neutral),
      "supportive" => Some(Self::Supportive),
      "curious" => Some(Self::Curious),
      "playful" => Some(Self::Playful),
      "sarcastic" => Some(Self::Sarcastic),
      "critical" => Some(Self::Critical),
      "angry" => Some(Self::Angry),
      "excited" => Some(Self::Excited),
      "thoughtful" => Some(Self::Thoughtful),
      _ => None,
    }
  }
}

/// What a reply is trying to do for the conversation.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ReplyIntent {
  AgreeExtend,
  DisagreeReason,
  AddContext,
  ShareExperience,
  Challenge,
  Joke,
  #[default]
  React,
}

impl ReplyIntent {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::AgreeExtend => "agree_extend",
      Self::DisagreeReason => "disagree_reason",
      Self::AddContext => "add_context",
      Self::ShareExperience => "share_experience",
      Self::Challenge => "challenge",
      Self::Joke => "joke",
      Self::React => "react",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "agree_extend" => Some(Self::AgreeExtend),
      "disagree_reason" => Some(Self::DisagreeReason),
      "add_context" => Some(Self::AddContext),
      "share_experience" => Some(Self::ShareExperience),
      "challenge" => Some(Self::Challenge),
      "joke" => Some(Self::Joke),
      "react" => Some(Self::React),
      _ => None,
    }
  }
}

// ─── Text ────────────────────────────────────────────────────────────────────

/// The body of a draft: one text for a tweet or reply, an ordered sequence
/// for a thread group. The store keeps the sequence form internally; a
/// sequence of length 1 decodes back to [`DraftText::Single`], so
/// thread-vs-scalar rendering is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftText {
  Single(String),
  Thread(Vec<String>),
}

impl DraftText {
  /// Rebuild from the stored sequence form. Length 1 means "render as
  /// scalar".
  pub fn from_parts(mut parts: Vec<String>) -> Self {
    if parts.len() == 1 {
      Self::Single(parts.remove(0))
    } else {
      Self::Thread(parts)
    }
  }

  /// The sequence form handed to the store.
  pub fn to_parts(&self) -> Vec<String> {
    match self {
      Self::Single(text) => vec![text.clone()],
      Self::Thread(parts) => parts.clone(),
    }
  }

  /// Join the parts into one reviewable block of text.
  pub fn flatten(&self) -> String {
    match self {
      Self::Single(text) => text.clone(),
      Self::Thread(parts) => parts.join("\n"),
    }
  }
}

// ─── Algorithm-alignment metadata ────────────────────────────────────────────

/// Per-draft alignment signals reported by the generation provider.
/// Every field is optional; out-of-vocabulary values are dropped during
/// parsing rather than rejecting the draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgoMetadata {
  pub expected_engagement: Option<Engagement>,
  pub suppression_risk:    Option<RiskLevel>,
  pub notes:               Option<String>,
  pub conversation_value:  Option<Level>,
  /// Thread-specific: only the first item of a thread carries this.
  pub hook_strength:       Option<String>,
  pub density_validated:   Option<bool>,
  pub unique_value:        Option<String>,
}

impl AlgoMetadata {
  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

/// Reply-specific context attached to reply drafts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyContext {
  /// The post being replied to, verbatim.
  pub to_text: String,
  pub tone:    ReplyTone,
  pub intent:  Option<ReplyIntent>,
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// One generated unit: a tweet, one thread item, or a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
  pub id:              Uuid,
  pub kind:            DraftKind,
  pub topic:           String,
  pub text:            DraftText,
  pub tags:            Vec<String>,
  pub spice:           Level,
  /// Must reference an existing persona version.
  pub persona_version: i64,
  pub rationale:       String,
  /// Provider-reported confidence in [0, 1].
  pub confidence:      f64,
  pub reply:           Option<ReplyContext>,
  pub algo:            Option<AlgoMetadata>,
}

/// Traceability metadata persisted alongside every draft.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftProvenance {
  pub provider:    String,
  pub model:       String,
  /// Content-addressed hash of the exact request sent.
  pub prompt_hash: String,
}
