//! Review types — the append-only outcome of scoring a draft.
//!
//! Many reviews may exist per draft; they are never merged or mutated.
//! A revision produced during review lives here as `revised_text`, not on
//! the draft.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{draft::RiskLevel, persona::Level};

/// A point where the persona's style rules and ranking-algorithm
/// constraints pulled in opposite directions, and how the provider
/// resolved it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaAlgoConflict {
  pub persona_rule:         String,
  pub algorithm_constraint: String,
  pub resolution:           String,
}

/// Algorithm-alignment scoring attached to a provider review.
///
/// `repetition_risk` and `conversation_value` are clamped to their closed
/// category sets during parsing; invalid or missing values fall back to
/// low and medium respectively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgoReview {
  pub algorithm_score:    Option<f64>,
  pub suppression_score:  Option<f64>,
  pub repetition_risk:    RiskLevel,
  pub conversation_value: Level,
  pub issues:             Vec<String>,
  pub conflicts:          Vec<PersonaAlgoConflict>,
  pub revision_reason:    Option<String>,
}

/// The outcome of scoring one draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub id:              Uuid,
  pub draft_id:        Uuid,
  /// How well the draft matches the persona's voice rules, in [0, 100].
  pub alignment_score: f64,
  pub violations:      Vec<String>,
  pub suggestions:     Vec<String>,
  pub revised_text:    Option<String>,
  pub algo:            Option<AlgoReview>,
}
