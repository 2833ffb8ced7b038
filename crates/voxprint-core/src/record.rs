//! Source records — imported posts, the raw material for voice profiling.
//!
//! Records are immutable once stored and are never deleted. The external
//! identifier is the unique key; a second record with the same identifier
//! is a duplicate and is skipped at insert time, never treated as an
//! update.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Open-ended engagement counters keyed by canonical metric name
/// (`like`, `retweet`, `reply`, `view`, `quote`, ...). Values stay as raw
/// JSON so exports with non-numeric metric payloads survive a round-trip.
pub type Metrics = BTreeMap<String, serde_json::Value>;

/// Origin tag recorded when an export does not name its own source.
pub const DEFAULT_ORIGIN: &str = "extension";

/// One imported post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
  /// Stable external identifier; unique across the store.
  pub record_id:  String,
  /// Creation timestamp, kept verbatim from the export. Exports disagree
  /// on timestamp shape; ISO-8601 strings sort chronologically, which is
  /// all the store relies on.
  pub created_at: String,
  pub text:       String,
  pub url:        Option<String>,
  /// Which export pathway produced this record.
  pub origin:     String,
  pub lang:       Option<String>,
  pub metrics:    Option<Metrics>,
  /// The untouched input object, preserved for forward compatibility.
  pub raw:        Option<serde_json::Value>,
}

/// Input to [`crate::store::PersonaStore::insert_record`].
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
  pub record_id:  String,
  pub created_at: String,
  pub text:       String,
  pub url:        Option<String>,
  pub origin:     String,
  pub lang:       Option<String>,
  pub metrics:    Option<Metrics>,
  pub raw:        Option<serde_json::Value>,
}
