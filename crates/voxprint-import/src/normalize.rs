//! Field normalisation for heterogeneous export objects.
//!
//! Export tools disagree on field names. Each canonical field resolves
//! through an ordered alias chain — first non-empty alias wins — and a
//! record is valid only if identifier, timestamp, and body text all
//! resolve to something non-empty.

use serde_json::{Map, Value};
use voxprint_core::record::{DEFAULT_ORIGIN, Metrics, NewRecord};

// ─── Alias chains ────────────────────────────────────────────────────────────

const ID_ALIASES: &[&str] = &["tweet_id", "id", "id_str", "tweetId"];
const TIMESTAMP_ALIASES: &[&str] =
  &["created_at", "createdAt", "timestamp", "date"];
const TEXT_ALIASES: &[&str] = &["text", "full_text", "content", "body"];
const URL_ALIASES: &[&str] = &["url", "tweet_url", "link", "permalink"];
const LANG_ALIASES: &[&str] = &["lang", "language"];

/// Canonical metric name → the aliases scanned when no metrics object is
/// present. First hit per group wins.
const METRIC_ALIASES: &[(&str, &[&str])] = &[
  ("like", &["like", "likes", "like_count", "favorite_count"]),
  ("retweet", &["retweet", "retweets", "retweet_count"]),
  ("reply", &["reply", "replies", "reply_count"]),
  ("view", &["view", "views", "impression_count", "impressions"]),
  ("quote", &["quote", "quotes", "quote_count"]),
];

// ─── Resolution helpers ──────────────────────────────────────────────────────

/// First alias that holds a non-empty string. Numbers are stringified so
/// exports with numeric identifiers still resolve.
fn resolve_string(obj: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
  for alias in aliases {
    match obj.get(*alias) {
      Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
      Some(Value::Number(n)) => return Some(n.to_string()),
      _ => {}
    }
  }
  None
}

/// Prefer an explicit metrics object, then the platform's nested
/// public-metrics object, then assemble one from individual alias fields.
fn resolve_metrics(obj: &Map<String, Value>) -> Option<Metrics> {
  for key in ["metrics", "public_metrics"] {
    if let Some(Value::Object(map)) = obj.get(key) {
      return Some(map.clone().into_iter().collect());
    }
  }

  let mut assembled = Metrics::new();
  for (canonical, aliases) in METRIC_ALIASES {
    for alias in *aliases {
      if let Some(value) = obj.get(*alias) {
        assembled.insert((*canonical).to_string(), value.clone());
        break;
      }
    }
  }

  // Absent, not an empty object.
  if assembled.is_empty() { None } else { Some(assembled) }
}

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Map one export object onto the canonical record shape.
///
/// Returns `None` when the object is not a JSON object or any required
/// field (identifier, timestamp, body text) fails to resolve — callers
/// count those as skipped-invalid.
pub fn normalize(value: &Value) -> Option<NewRecord> {
  let obj = value.as_object()?;

  let record_id = resolve_string(obj, ID_ALIASES)?;
  let created_at = resolve_string(obj, TIMESTAMP_ALIASES)?;
  let text = resolve_string(obj, TEXT_ALIASES)?;
  let text = text.trim().to_string();
  if text.is_empty() {
    return None;
  }

  let origin = resolve_string(obj, &["source"])
    .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

  Some(NewRecord {
    record_id,
    created_at,
    text,
    url: resolve_string(obj, URL_ALIASES),
    origin,
    lang: resolve_string(obj, LANG_ALIASES),
    metrics: resolve_metrics(obj),
    raw: Some(value.clone()),
  })
}
