//! The `PersonaStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `voxprint-store-sqlite`). Higher layers (`voxprint-engine`,
//! `voxprint-api`) depend on this abstraction, not on any concrete
//! backend. The store exclusively owns persistence and the
//! uniqueness/versioning invariants; no other component caches
//! authoritative state.

use std::future::Future;

use uuid::Uuid;

use crate::{
  draft::{Draft, DraftProvenance},
  persona::Persona,
  record::{NewRecord, SourceRecord},
  review::Review,
};

// ─── Outcomes & queries ──────────────────────────────────────────────────────

/// Result of inserting a single record. Identifier collision is a counted
/// skip, never an error and never an overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
  Inserted,
  Duplicate,
}

/// Counts from a sequential batch insert. Validation happens upstream in
/// the import layer; the store only distinguishes fresh from duplicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
  pub inserted:  u64,
  pub duplicate: u64,
}

/// Parameters for [`PersonaStore::recent_records`].
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
  /// Only records with `created_at >= since` (lexical ISO-8601 compare).
  pub since:  Option<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a voxprint storage backend.
///
/// All writes are append-only: records, persona versions, drafts, and
/// reviews are immutable once stored. Versioning (monotonic persona
/// versions) and identifier uniqueness are enforced here, not by callers.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PersonaStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Records ───────────────────────────────────────────────────────────

  /// Insert one record; an existing identifier reports
  /// [`InsertOutcome::Duplicate`] and leaves the stored row untouched.
  fn insert_record(
    &self,
    input: NewRecord,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  /// Insert a batch sequentially in input order, skipping duplicates.
  fn insert_records(
    &self,
    inputs: Vec<NewRecord>,
  ) -> impl Future<Output = Result<BatchOutcome, Self::Error>> + Send + '_;

  fn record_count(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Most recent records first.
  fn recent_records(
    &self,
    query: RecordQuery,
  ) -> impl Future<Output = Result<Vec<SourceRecord>, Self::Error>> + Send + '_;

  /// The full record set in chronological order. This feeds the
  /// stratified sampler and is the only sanctioned bulk read of
  /// historical bodies for profile construction.
  fn records_chronological(
    &self,
  ) -> impl Future<Output = Result<Vec<SourceRecord>, Self::Error>> + Send + '_;

  // ── Personas ──────────────────────────────────────────────────────────

  /// Persist a new persona version. The store assigns the next version
  /// (monotonically increasing, never reused) and returns it; the
  /// `version` field on the argument is ignored.
  fn save_persona(
    &self,
    persona: &Persona,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// The row with the maximum version, or `None` if no persona exists.
  fn latest_persona(
    &self,
  ) -> impl Future<Output = Result<Option<Persona>, Self::Error>> + Send + '_;

  fn persona_by_version(
    &self,
    version: i64,
  ) -> impl Future<Output = Result<Option<Persona>, Self::Error>> + Send + '_;

  // ── Drafts ────────────────────────────────────────────────────────────

  /// Persist one draft with its provenance. The draft's text is stored as
  /// an ordered sequence even for single-text drafts (length 1 signals
  /// "render as scalar") so thread-vs-tweet rendering is lossless.
  fn save_draft(
    &self,
    draft: &Draft,
    provenance: &DraftProvenance,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Most recently created drafts first.
  fn recent_drafts(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Draft>, Self::Error>> + Send + '_;

  fn draft_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Draft>, Self::Error>> + Send + '_;

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Append one review. Reviews are never deduplicated or merged.
  fn save_review(
    &self,
    review: &Review,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All reviews for a draft, newest first.
  fn reviews_for_draft(
    &self,
    draft_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;
}
