//! Deterministic suppression-risk classification.
//!
//! A pure function over draft text: no provider call, no randomness, no
//! state. Identical input always yields an identical report, which makes
//! this usable as an instant, free cross-check against provider-scored
//! reviews.
//!
//! Question-style signals dominate the risk resolution: they are treated
//! as the highest-confidence demotion signal, so any question match lifts
//! the floor to medium before the count-based thresholds apply.

use serde::{Deserialize, Serialize};

use crate::draft::RiskLevel;

// ─── Pattern tables ──────────────────────────────────────────────────────────

/// Engagement-bait phrases, matched anywhere in the lowercased text.
const ENGAGEMENT_BAIT: &[&str] = &[
  "like if",
  "rt if",
  "retweet if",
  "follow for follow",
  "f4f",
  "like for like",
  "l4l",
  "follow back",
];

/// Question-style phrases, matched anywhere in the lowercased text.
const QUESTION_PATTERNS: &[&str] = &[
  "what do you think",
  "anyone else",
  "am i the only one",
  "thoughts?",
  "agree or disagree",
  "right?",
  "don't you think",
  "isn't it",
  "wouldn't you",
  "who else",
];

/// Opinion-labeling openers, matched only at the start of the text or
/// space-preceded within its first 50 characters.
const OPINION_LABELS: &[&str] = &[
  "unpopular opinion",
  "hot take",
  "controversial take",
  "just saying",
  "hear me out",
  "most people miss this",
  "most people don't realize",
  "most people won't tell you",
  "most people forget",
  "most people overlook",
  "i'll probably get hate for this",
  "not sure if this is controversial",
  "this might be a hot take",
  "everyone's wrong about",
];

/// Posts whose entire body is one of these read as low-effort filler.
const LOW_EFFORT: &[&str] =
  &["this", "same", "facts", "real", "\u{1f4af}", "\u{1f525}", "\u{1f44d}"];

const MAX_HASHTAGS: usize = 3;
const MAX_MENTIONS: usize = 3;

/// How far into the text an opinion label still counts as an opener.
const OPENER_WINDOW: usize = 50;

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
  Ok,
  Review,
}

/// The classifier's verdict on one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuppressionReport {
  pub risk:           RiskLevel,
  /// Tags for every matched pattern, e.g. `engagement_bait:like if` or
  /// `multiple_questions:3`.
  pub patterns:       Vec<String>,
  pub recommendation: Recommendation,
}

// ─── Classifier ──────────────────────────────────────────────────────────────

/// Classify `text` against the fixed pattern tables.
pub fn classify(text: &str) -> SuppressionReport {
  let lower = text.to_lowercase();
  let lower = lower.trim();
  let mut patterns: Vec<String> = Vec::new();

  for pattern in ENGAGEMENT_BAIT {
    if lower.contains(pattern) {
      patterns.push(format!("engagement_bait:{pattern}"));
    }
  }

  for pattern in QUESTION_PATTERNS {
    if lower.contains(pattern) {
      patterns.push(format!("question_pattern:{pattern}"));
    }
  }

  let opener: String = lower.chars().take(OPENER_WINDOW).collect();
  for pattern in OPINION_LABELS {
    if lower.starts_with(pattern) || opener.contains(&format!(" {pattern}")) {
      patterns.push(format!("opinion_label:{pattern}"));
    }
  }

  // Ending and count checks run on the original text, not the lowercased
  // copy, so multi-byte characters count once each.
  if text.trim_end().ends_with('?') {
    patterns.push("ends_with_question".to_string());
  }

  let question_count = text.matches('?').count();
  if question_count > 1 {
    patterns.push(format!("multiple_questions:{question_count}"));
  }

  let hashtag_count = text.matches('#').count();
  if hashtag_count > MAX_HASHTAGS {
    patterns.push(format!("excessive_hashtags:{hashtag_count}"));
  }

  let mention_count = text.matches('@').count();
  if mention_count > MAX_MENTIONS {
    patterns.push(format!("excessive_mentions:{mention_count}"));
  }

  if LOW_EFFORT.contains(&lower) || LOW_EFFORT.contains(&text.trim()) {
    patterns.push("low_effort_content".to_string());
  }

  let risk = resolve_risk(&patterns);
  let recommendation = if risk == RiskLevel::Low {
    Recommendation::Ok
  } else {
    Recommendation::Review
  };

  SuppressionReport { risk, patterns, recommendation }
}

/// Question signals dominate; other signals escalate by count.
fn resolve_risk(patterns: &[String]) -> RiskLevel {
  let question_tags =
    patterns.iter().filter(|p| p.contains("question")).count();
  let other_tags = patterns.len() - question_tags;

  if question_tags > 0 {
    if question_tags > 1 || other_tags > 0 {
      RiskLevel::High
    } else {
      RiskLevel::Medium
    }
  } else {
    match other_tags {
      0 => RiskLevel::Low,
      1..=2 => RiskLevel::Medium,
      _ => RiskLevel::High,
    }
  }
}
