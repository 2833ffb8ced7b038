//! Deterministic stub payloads served when no backend is reachable.
//!
//! They keep the whole pipeline runnable offline: the payload shape is
//! chosen from markers in the request so each orchestrator receives
//! something its parser understands.

use serde_json::{Value, json};

use crate::JsonRequest;

/// Pick a stub payload matching the request's apparent purpose.
pub fn stub_json(request: &JsonRequest) -> Value {
  let prompt = request.prompt.to_lowercase();
  let schema = request.schema_hint.to_string();

  if prompt.contains("voice profile") || schema.contains("voice_rules") {
    return stub_persona();
  }
  if prompt.contains("review") && prompt.contains("alignment") {
    return stub_review();
  }
  if prompt.contains("reply drafts") {
    return stub_replies();
  }
  if prompt.contains("thread") {
    return stub_thread();
  }
  if prompt.contains("draft") {
    return stub_drafts();
  }

  json!({ "status": "stub", "message": "no generation backend configured" })
}

pub fn stub_text() -> String {
  "Stub response: no generation backend configured.".to_string()
}

fn stub_persona() -> Value {
  json!({
    "display_name": "Stub Voice Profile",
    "voice_rules": {
      "sentence_length": "short",
      "hook_styles": ["observation", "contrarian"],
      "humor_style": ["dry"],
      "jargon_level": "medium",
      "directness": "high"
    },
    "tone": { "spice_default": "medium", "safe_mode": true },
    "topics": [
      { "name": "technology", "weight": 0.4 },
      { "name": "productivity", "weight": 0.3 }
    ],
    "formatting": {
      "emoji_rate": "low",
      "punctuation_style": "minimal",
      "line_breaks": "rare"
    },
    "constraints": { "no_slurs": true, "no_threats": true, "max_chars": 280 },
    "examples": {
      "signature_patterns": ["Short opener. Hard truth.", "One-liner with punch."]
    }
  })
}

fn stub_drafts() -> Value {
  json!({
    "drafts": [{
      "text": "Stub draft: your real content will appear here.",
      "tags": ["stub"],
      "rationale": "placeholder draft",
      "confidence": 0.8,
      "expected_engagement": "reply",
      "suppression_risk": "low"
    }]
  })
}

fn stub_thread() -> Value {
  json!({
    "thread": [
      { "text": "Stub thread hook.", "purpose": "hook", "density_score": "high" },
      { "text": "Stub thread body.", "purpose": "body", "density_score": "medium" }
    ],
    "recommended_tweet_count": 2,
    "density_validated": true,
    "hook_strength": "moderate",
    "suppression_risks": [],
    "rationale": "placeholder thread"
  })
}

fn stub_replies() -> Value {
  json!({
    "replies": [{
      "text": "Stub reply: configure a backend for real output.",
      "approach": "react",
      "rationale": "placeholder reply",
      "confidence": 0.8,
      "suppression_risk": "low",
      "conversation_value": "medium"
    }]
  })
}

fn stub_review() -> Value {
  json!({
    "alignment_score": 85,
    "violations": [],
    "suggestions": ["configure a backend for real review scoring"],
    "revised_text": null,
    "repetition_risk": "low",
    "conversation_value": "medium",
    "algorithm_issues": []
  })
}
