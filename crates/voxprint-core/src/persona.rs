//! Persona — the versioned, compact description of an account's voice.
//!
//! A persona is distilled from sampled records once and reused for every
//! generation and review call afterwards. It must stay compact: abstracted
//! patterns only, never full historical posts.
//!
//! Every sub-struct deserialises permissively (missing fields fall back to
//! defaults) because the shape ultimately comes from a generation provider
//! whose output is not guaranteed to be complete.

use serde::{Deserialize, Serialize};

// ─── Scales ──────────────────────────────────────────────────────────────────

/// Three-step intensity scale shared by voice rules and tone settings.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Low,
  #[default]
  Medium,
  High,
}

impl Level {
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

/// Sentence-length tendency.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SentenceLength {
  Short,
  #[default]
  Medium,
  Long,
}

impl SentenceLength {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Short => "short",
      Self::Medium => "medium",
      Self::Long => "long",
    }
  }
}

// ─── Voice ───────────────────────────────────────────────────────────────────

/// Voice characteristics extracted from historical posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceRules {
  pub sentence_length: SentenceLength,
  pub hook_styles:     Vec<String>,
  pub humor_style:     Vec<String>,
  pub jargon_level:    Level,
  pub directness:      Level,
}

/// Tone defaults applied when a generation request does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tone {
  pub spice_default: Level,
  pub safe_mode:     bool,
}

impl Default for Tone {
  fn default() -> Self {
    Self { spice_default: Level::Medium, safe_mode: true }
  }
}

/// A weighted topic the persona covers. Weights live in [0, 1] and are not
/// required to sum to 1 across a persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
  pub name:   String,
  pub weight: f64,
}

// ─── Formatting ──────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EmojiRate {
  None,
  #[default]
  Low,
  Medium,
  High,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PunctuationStyle {
  #[default]
  Minimal,
  Standard,
  Expressive,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LineBreaks {
  None,
  #[default]
  Rare,
  Frequent,
}

/// Formatting preferences extracted from historical posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Formatting {
  pub emoji_rate:        EmojiRate,
  pub punctuation_style: PunctuationStyle,
  pub line_breaks:       LineBreaks,
}

// ─── Constraints & examples ──────────────────────────────────────────────────

/// Hard constraints for content generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
  pub no_slurs:   bool,
  pub no_threats: bool,
  pub max_chars:  u32,
}

impl Default for Constraints {
  fn default() -> Self {
    Self { no_slurs: true, no_threats: true, max_chars: 280 }
  }
}

/// Abstracted style fragments. Never full historical posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Examples {
  pub signature_patterns: Vec<String>,
}

// ─── Persona ─────────────────────────────────────────────────────────────────

/// The versioned voice profile. The version is assigned by the store on
/// save — the field here is only meaningful after a round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
  pub version:      i64,
  pub display_name: String,
  pub voice_rules:  VoiceRules,
  pub tone:         Tone,
  pub topics:       Vec<Topic>,
  pub formatting:   Formatting,
  pub constraints:  Constraints,
  pub examples:     Examples,
}

impl Default for Persona {
  fn default() -> Self {
    Self {
      version:      1,
      display_name: "Voice Profile".to_string(),
      voice_rules:  VoiceRules::default(),
      tone:         Tone::default(),
      topics:       Vec::new(),
      formatting:   Formatting::default(),
      constraints:  Constraints::default(),
      examples:     Examples::default(),
    }
  }
}

impl Persona {
  /// Render the persona as the compact JSON block embedded in requests.
  pub fn to_prompt_context(&self) -> String {
    serde_json::to_string_pretty(self)
      .unwrap_or_else(|_| "{}".to_string())
  }

  /// Loose JSON-schema hint handed to the structured-generation capability
  /// during profile extraction. Shallow on purpose — the permissive
  /// deserialisation above is the real validation layer.
  pub fn schema_hint() -> serde_json::Value {
    serde_json::json!({
      "type": "object",
      "properties": {
        "display_name": { "type": "string" },
        "voice_rules": {
          "type": "object",
          "properties": {
            "sentence_length": { "enum": ["short", "medium", "long"] },
            "hook_styles":     { "type": "array", "items": { "type": "string" } },
            "humor_style":     { "type": "array", "items": { "type": "string" } },
            "jargon_level":    { "enum": ["low", "medium", "high"] },
            "directness":      { "enum": ["low", "medium", "high"] }
          }
        },
        "tone": {
          "type": "object",
          "properties": {
            "spice_default": { "enum": ["low", "medium", "high"] },
            "safe_mode":     { "type": "boolean" }
          }
        },
        "topics": {
          "type": "array",
          "items": {
            "type": "object",
            "properties": {
              "name":   { "type": "string" },
              "weight": { "type": "number", "minimum": 0.0, "maximum": 1.0 }
            }
          }
        },
        "formatting": {
          "type": "object",
          "properties": {
            "emoji_rate":        { "enum": ["none", "low", "medium", "high"] },
            "punctuation_style": { "enum": ["minimal", "standard", "expressive"] },
            "line_breaks":       { "enum": ["none", "rare", "frequent"] }
          }
        },
        "constraints": {
          "type": "object",
          "properties": {
            "no_slurs":   { "type": "boolean" },
            "no_threats": { "type": "boolean" },
            "max_chars":  { "type": "integer" }
          }
        },
        "examples": {
          "type": "object",
          "properties": {
            "signature_patterns": { "type": "array", "items": { "type": "string" } }
          }
        }
      }
    })
  }
}
